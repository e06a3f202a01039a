// src/plugin/contract_tests.rs - Contract conformance tests for temperature drivers

use super::*;
use crate::comms::{ChannelOp, RecordingChannel};

/// Line-protocol heater used to exercise the contract. Speaks a terse
/// string format ("HEAT <celsius>C;", "STOP HEAT;") and optionally checks
/// targets against a working range from its parameters.
#[derive(Debug)]
struct StringHeater {
    min_k: f64,
    max_k: f64,
    await_ack: bool,
}

impl StringHeater {
    fn check_range(&self, kelvin: f64) -> Result<(), PluginError> {
        if !kelvin.is_finite() || kelvin < self.min_k || kelvin > self.max_k {
            return Err(PluginError::validation(format!(
                "target {kelvin} K outside supported range {}..={} K",
                self.min_k, self.max_k
            )));
        }
        Ok(())
    }

    async fn expect_ack(&self, channel: &mut dyn CommandChannel) -> Result<(), PluginError> {
        let line = channel.receive_string().await?;
        let line = line.trim_end();
        if line != "ok" {
            return Err(PluginError::Comms(CommsError::Malformed(line.to_string())));
        }
        Ok(())
    }
}

#[async_trait]
impl TemperaturePlugin for StringHeater {
    fn from_config(config: &PluginConfiguration) -> Result<Self, PluginError> {
        Ok(Self {
            min_k: config.param_f64_or("min_temp_k", 0.0)?,
            max_k: config.param_f64_or("max_temp_k", f64::INFINITY)?,
            await_ack: config.param_bool_or("ack", false)?,
        })
    }

    async fn apply_temperature(
        &mut self,
        channel: &mut dyn CommandChannel,
        kelvin: f64,
    ) -> Result<(), PluginError> {
        self.check_range(kelvin)?;
        channel.synch().await?;
        let command = format!("HEAT {:.2}C;\n", kelvin_to_celsius(kelvin));
        channel.send_string(&command).await?;
        if self.await_ack {
            self.expect_ack(channel).await?;
        }
        Ok(())
    }

    async fn turn_off(&mut self, channel: &mut dyn CommandChannel) -> Result<(), PluginError> {
        channel.send_string("STOP HEAT;\n").await?;
        if self.await_ack {
            self.expect_ack(channel).await?;
        }
        Ok(())
    }
}

fn empty_config() -> PluginConfiguration {
    PluginConfiguration::new("test_heater", "StringHeater")
}

#[test]
fn constructs_from_empty_params_without_channel() {
    let heater = StringHeater::from_config(&empty_config()).unwrap();
    assert_eq!(heater.min_k, 0.0);
    assert_eq!(heater.max_k, f64::INFINITY);
}

#[test]
fn malformed_params_fail_construction() {
    let config = empty_config().with_param("min_temp_k", "cold-ish");
    let err = StringHeater::from_config(&config).unwrap_err();
    assert!(matches!(
        err,
        PluginError::Config(ConfigError::InvalidParam { .. })
    ));
}

#[tokio::test]
async fn apply_records_at_least_one_send() {
    let mut heater = StringHeater::from_config(&empty_config()).unwrap();
    let mut chan = RecordingChannel::new();

    heater.apply_temperature(&mut chan, 300.0).await.unwrap();

    assert!(!chan.sent().is_empty());
    assert_eq!(chan.sent()[0], "HEAT 26.85C;\n");
}

#[tokio::test]
async fn apply_goes_through_channel_primitives_only() {
    let mut heater = StringHeater::from_config(&empty_config()).unwrap();
    let mut chan = RecordingChannel::new();

    heater.apply_temperature(&mut chan, 310.0).await.unwrap();

    assert_eq!(
        chan.ops(),
        [
            ChannelOp::Synch,
            ChannelOp::Send("HEAT 36.85C;\n".to_string()),
        ]
    );
}

#[tokio::test]
async fn turn_off_twice_is_safe() {
    let mut heater = StringHeater::from_config(&empty_config()).unwrap();
    let mut chan = RecordingChannel::new();

    heater.turn_off(&mut chan).await.unwrap();
    heater.turn_off(&mut chan).await.unwrap();

    assert_eq!(chan.joined(), "STOP HEAT;\nSTOP HEAT;\n");
}

#[tokio::test]
async fn receive_failure_propagates_as_comms_error() {
    let config = empty_config().with_param("ack", "true");
    let mut heater = StringHeater::from_config(&config).unwrap();

    let mut chan = RecordingChannel::new();
    chan.push_error(CommsError::Closed);

    let err = heater.apply_temperature(&mut chan, 300.0).await.unwrap_err();
    assert!(matches!(err, PluginError::Comms(CommsError::Closed)));
}

#[tokio::test]
async fn synch_failure_propagates_as_comms_error() {
    let mut heater = StringHeater::from_config(&empty_config()).unwrap();

    let mut chan = RecordingChannel::new();
    chan.fail_next_synch(CommsError::Closed);

    let err = heater.apply_temperature(&mut chan, 300.0).await.unwrap_err();
    assert!(matches!(err, PluginError::Comms(CommsError::Closed)));
    assert!(chan.sent().is_empty());
}

#[tokio::test]
async fn out_of_range_target_sends_nothing() {
    let config = empty_config()
        .with_param("min_temp_k", "273.15")
        .with_param("max_temp_k", "373.15");
    let mut heater = StringHeater::from_config(&config).unwrap();
    let mut chan = RecordingChannel::new();

    let err = heater.apply_temperature(&mut chan, 500.0).await.unwrap_err();

    assert!(matches!(err, PluginError::Validation(_)));
    assert!(chan.ops().is_empty());
}

#[tokio::test]
async fn non_finite_target_is_rejected() {
    let mut heater = StringHeater::from_config(&empty_config()).unwrap();
    let mut chan = RecordingChannel::new();

    let err = heater
        .apply_temperature(&mut chan, f64::NAN)
        .await
        .unwrap_err();

    assert!(matches!(err, PluginError::Validation(_)));
    assert!(chan.ops().is_empty());
}

#[tokio::test]
async fn unexpected_ack_is_a_malformed_response() {
    let config = empty_config().with_param("ack", "true");
    let mut heater = StringHeater::from_config(&config).unwrap();

    let mut chan = RecordingChannel::new();
    chan.push_response("ERR overheat\n");

    let err = heater.apply_temperature(&mut chan, 300.0).await.unwrap_err();
    assert!(matches!(
        err,
        PluginError::Comms(CommsError::Malformed(m)) if m == "ERR overheat"
    ));
}

#[tokio::test]
async fn drivers_work_behind_a_box() {
    let mut plugin: BoxedTemperaturePlugin =
        Box::new(StringHeater::from_config(&empty_config()).unwrap());
    let mut chan = RecordingChannel::new();

    plugin.apply_temperature(&mut chan, 300.0).await.unwrap();
    plugin.turn_off(&mut chan).await.unwrap();

    assert_eq!(chan.joined(), "HEAT 26.85C;\nSTOP HEAT;\n");
}
