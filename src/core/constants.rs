//! Wire constants and channel calibration factors

/// Frame marker preceding every telemetry payload, little-endian on the wire
pub const FRAME_MAGIC: u32 = 0x7465_6c65;

/// Width of the frame marker in bytes
pub const MAGIC_LEN: usize = 4;

/// ADC reference voltage (V)
pub const ADC_VREF: f64 = 3.3;

/// ADC full-scale count
pub const ADC_FULL_SCALE: f64 = 4096.0;

// Counts-to-physical conversion factors for the analog front end.
// Gain is the divider ratio (or 1/shunt for currents) times Vref over full scale.

/// Input voltage divider, volts per count
pub const V_IN_PER_COUNT: f64 = ADC_VREF * 11.0 / ADC_FULL_SCALE;

/// Input current sense, amps per count
pub const I_IN_PER_COUNT: f64 = ADC_VREF / ADC_FULL_SCALE;

/// Output voltage divider, volts per count
pub const V_OUT_PER_COUNT: f64 = ADC_VREF * 200.6 / ADC_FULL_SCALE;

/// Output current sense, amps per count
pub const I_OUT_PER_COUNT: f64 = ADC_VREF * 0.04 / ADC_FULL_SCALE;

/// Switch-node voltage divider, volts per count
pub const V_Q_PER_COUNT: f64 = ADC_VREF * 21.0 / ADC_FULL_SCALE;

/// Switch current sense (0.51 ohm shunt), amps per count
pub const I_Q_PER_COUNT: f64 = ADC_VREF * (1.0 / 0.51) / ADC_FULL_SCALE;
