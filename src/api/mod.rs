// =============================================================================
// Dashboard API — REST + WebSocket
// =============================================================================

pub mod rest;
pub mod ws;
