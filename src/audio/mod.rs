pub mod audio_engine;
pub mod constants;
pub mod gain_parameter;
pub mod meter_communication;
pub mod meter_engine;
pub mod peak_detector;
pub mod smoother;
