pub mod analysis_matcher;
pub mod cli;
pub mod client;
pub mod element_filter;
pub mod path_format;
pub mod path_resolver;
pub mod report;
pub mod settings;
pub mod time_range;
pub mod webapi;
pub mod workflow;
