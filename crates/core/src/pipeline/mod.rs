pub mod live_detection_use_case;
pub mod loop_state;
pub mod pipeline_logger;
pub mod region_filter;
