use crate::db::PlayerRepository;
use crate::utils::token::TokenService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub players: Arc<dyn PlayerRepository>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(players: Arc<dyn PlayerRepository>, tokens: TokenService) -> Self {
        Self { players, tokens }
    }
}
