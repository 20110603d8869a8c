// Scripted StageApi whose list calls can be held open
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use stage_client::{ClientError, ClientResult, Stage, StageApi, StageData, StageId};
use tokio::sync::oneshot;

struct ScriptedList {
    stages: Vec<Stage>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Answers list calls from a script, in order. A gated answer is returned
/// only after its sender fires. Once the script runs out, lists are empty.
#[derive(Default)]
pub struct GatedApi {
    script: Mutex<VecDeque<ScriptedList>>,
    list_calls: AtomicUsize,
    created: Mutex<Vec<StageData>>,
    deleted: Mutex<Vec<StageId>>,
}

impl GatedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_list(&self, stages: Vec<Stage>) {
        self.script.lock().unwrap().push_back(ScriptedList { stages, gate: None });
    }

    pub fn push_gated_list(&self, stages: Vec<Stage>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back(ScriptedList {
            stages,
            gate: Some(rx),
        });
        tx
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<StageData> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<StageId> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl StageApi for GatedApi {
    async fn list(&self) -> ClientResult<Vec<Stage>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(ScriptedList { stages, gate }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                Ok(stages)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn get(&self, id: StageId) -> ClientResult<Stage> {
        log::debug!("gated api has no stage {}", id);
        Err(ClientError::from_status(reqwest::StatusCode::NOT_FOUND))
    }

    async fn create(&self, data: &StageData) -> ClientResult<()> {
        self.created.lock().unwrap().push(data.clone());
        Ok(())
    }

    async fn update(&self, _id: StageId, _data: &StageData) -> ClientResult<()> {
        Ok(())
    }

    async fn delete(&self, id: StageId) -> ClientResult<()> {
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}
