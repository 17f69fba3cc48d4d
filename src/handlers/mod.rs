// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (JWT auth + live user) → Elevated (admin role)
//
// Handlers stay thin: extract, call a service, wrap the result in ApiResponse.

pub mod public; // Tier 1: No authentication required (/, /health, /api/auth/*, /api/contact)
pub mod protected; // Tier 2: JWT authentication required (/api/auth/me, /api/user/*, ...)
pub mod elevated; // Tier 3: Admin or superadmin required (/api/admin/*)

use serde::Deserialize;

/// `?limit=` on list endpoints. Clamped through `AppConfig::page_size`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}
