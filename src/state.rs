use std::sync::Arc;
use crate::generator::AnswerGenerator;
use crate::store::AnswerStore;
// app's shared state, collaborators are built once in main

pub struct AppState {
    pub store: Arc<dyn AnswerStore>,
    pub generator: Arc<dyn AnswerGenerator>,
}

impl AppState {
    pub fn new(store: Arc<dyn AnswerStore>, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self { store, generator }
    }
}
