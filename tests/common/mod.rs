#![allow(dead_code)]

pub mod gated_api;
pub mod mock_stage_server;

use stage_client::{Stage, StageId, StageUrls};

pub fn stage(id: i64, name: &str, urls: &[(&str, &str)]) -> Stage {
    let mut stages = StageUrls::new();
    for (label, url) in urls {
        stages.insert(label.to_string(), url.to_string());
    }
    Stage {
        id: StageId(id),
        stage_name: name.to_string(),
        stages,
    }
}

pub fn init_test_logging() {
    stage_client::logging::init_logging(log::LevelFilter::Debug);
}
