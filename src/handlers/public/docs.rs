// handlers/public/docs.rs - GET /api-docs, static route catalogue

use axum::response::Json;
use serde_json::{json, Value};

const RESOURCES: &[(&str, &str)] = &[
    ("animals", "Animals owned by the caller"),
    ("roles", "Roles (write: admin, role 1 immutable)"),
    ("medical-records", "Medical history per animal"),
    ("state-records", "Condition observations per animal"),
    ("treatments", "Treatments per animal"),
    ("logs", "Audit log (append: any user, read: admin)"),
    ("smart-devices", "Devices registered by the caller"),
    ("users", "User accounts (admin only)"),
];

pub async fn docs_get() -> Json<Value> {
    let resources: Vec<Value> = RESOURCES
        .iter()
        .map(|(name, description)| {
            json!({
                "name": name,
                "description": description,
                "routes": [
                    format!("GET /api/{}", name),
                    format!("GET /api/{}/:id", name),
                    format!("POST /api/{}", name),
                    format!("PUT /api/{}/:id", name),
                    format!("DELETE /api/{}/:id", name),
                ],
            })
        })
        .collect();

    Json(json!({
        "name": "Pet Shelter API",
        "version": env!("CARGO_PKG_VERSION"),
        "authentication": "Authorization: Bearer <token> on every route except the public ones",
        "public": [
            "GET /",
            "GET /health",
            "GET /api-docs",
            "POST /api/users/register",
            "POST /api/users/login",
        ],
        "resources": resources,
        "admin": [
            "POST /api/admin/block/:id",
            "POST /api/admin/unblock/:id",
            "GET /api/admin/statistics",
        ],
    }))
}
