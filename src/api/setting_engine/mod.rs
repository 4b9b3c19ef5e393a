#[cfg(test)]
mod setting_engine_test;

use crate::error::{Error, Result};
use crate::{DEFAULT_TARGET_BITRATE, RECEIVE_MTU};

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

/// How often a layer's sender is asked for a keyframe and told the target bitrate.
pub const DEFAULT_FEEDBACK_INTERVAL: Duration = Duration::from_secs(3);

/// SettingEngine allows influencing behavior in ways that are not
/// supported by the WebRTC API. This allows us to support additional
/// use-cases without deviating from the WebRTC API elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingEngine {
    pub(crate) receive_mtu: usize,
    pub(crate) feedback_interval: Duration,
    pub(crate) target_bitrate: u64,
    pub(crate) feedback_enabled: bool,
}

impl Default for SettingEngine {
    fn default() -> Self {
        SettingEngine {
            receive_mtu: RECEIVE_MTU,
            feedback_interval: DEFAULT_FEEDBACK_INTERVAL,
            target_bitrate: DEFAULT_TARGET_BITRATE,
            feedback_enabled: true,
        }
    }
}

impl SettingEngine {
    /// from_json reads a SettingEngine; missing fields keep their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        let setting_engine: SettingEngine = serde_json::from_str(s)?;
        if setting_engine.feedback_interval.is_zero() {
            return Err(Error::ErrSettingEngineZeroFeedbackInterval);
        }
        Ok(setting_engine)
    }

    /// get_receive_mtu returns the configured MTU. If SettingEngine's MTU is configured to 0 it returns the default
    pub(crate) fn get_receive_mtu(&self) -> usize {
        if self.receive_mtu != 0 {
            self.receive_mtu
        } else {
            RECEIVE_MTU
        }
    }

    /// set_receive_mtu sets the size of read buffer that copies incoming packets. This is optional.
    /// Leave this 0 for the default receive_mtu
    pub fn set_receive_mtu(&mut self, receive_mtu: usize) {
        self.receive_mtu = receive_mtu;
    }

    pub fn feedback_interval(&self) -> Duration {
        self.feedback_interval
    }

    /// set_feedback_interval sets the period between two rounds of PLI and
    /// REMB per layer. Browsers are typically fine with 1 to 3 seconds.
    pub fn set_feedback_interval(&mut self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(Error::ErrSettingEngineZeroFeedbackInterval);
        }
        self.feedback_interval = interval;
        Ok(())
    }

    pub fn target_bitrate(&self) -> u64 {
        self.target_bitrate
    }

    /// set_target_bitrate sets the bitrate in bits per second advertised in REMB.
    pub fn set_target_bitrate(&mut self, bitrate: u64) {
        self.target_bitrate = bitrate;
    }

    pub fn feedback_enabled(&self) -> bool {
        self.feedback_enabled
    }

    /// disable_feedback stops relays from sending PLI and REMB, leaving
    /// keyframe and bandwidth control to the embedder.
    pub fn disable_feedback(&mut self, is_disabled: bool) {
        self.feedback_enabled = !is_disabled;
    }
}
