pub mod api;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod form;
pub mod logging;
pub mod refresh;
pub mod stage;
pub mod view;

pub use api::{HttpStageApi, StageApi};
pub use config::ClientConfig;
pub use controller::{StageController, UiEvent};
pub use error::{ClientError, ClientResult, FormError};
pub use stage::{Stage, StageData, StageId, StageUrls};
