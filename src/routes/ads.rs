use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use super::{non_empty, parse_id};
use crate::auth::AdminSession;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::ad::{Ad, AdInput};
use crate::uploads::save_upload;

// ── Public selection ───────────────────────────────────

/// Best ad for a slot, or `null` when nothing qualifies.
#[get("/ads?<slot>&<categoria>")]
pub fn select_ad(
    pool: &State<DbPool>,
    slot: Option<&str>,
    categoria: Option<&str>,
) -> Result<Json<Option<Ad>>, ApiError> {
    let slot = non_empty(slot).ok_or_else(|| ApiError::validation("slot é obrigatório."))?;

    Ad::select(pool, slot, non_empty(categoria))
        .map(Json)
        .map_err(|e| ApiError::internal("Erro ao buscar anúncio.", e))
}

// ── Admin management ───────────────────────────────────

#[derive(FromForm)]
pub struct AdUpload<'f> {
    pub slot: Option<String>,
    #[field(name = "titulo")]
    pub title: Option<String>,
    #[field(name = "texto")]
    pub text: Option<String>,
    pub href: Option<String>,
    #[field(name = "categoria")]
    pub category: Option<String>,
    #[field(name = "tipo")]
    pub kind: Option<String>,
    #[field(name = "peso")]
    pub weight: Option<String>,
    pub adsense_slot: Option<String>,
    #[field(name = "ativo")]
    pub active: Option<String>,
    #[field(name = "imagem")]
    pub image: Option<TempFile<'f>>,
}

#[post("/admin/ads", data = "<form>")]
pub async fn create_ad(
    admin: AdminSession,
    pool: &State<DbPool>,
    config: &State<AppConfig>,
    mut form: Form<AdUpload<'_>>,
) -> Result<(Status, Json<Ad>), ApiError> {
    let ad = AdInput {
        slot: form.slot.take(),
        title: form.title.take(),
        text: form.text.take(),
        href: form.href.take(),
        category: form.category.take(),
        kind: form.kind.take(),
        weight: form.weight.take(),
        adsense_slot: form.adsense_slot.take(),
        active: form.active.take(),
    }
    .validate()?;

    let image = match form.image.as_mut() {
        Some(f) if f.len() > 0 => Some(
            save_upload(f, &config.uploads_dir)
                .await
                .map_err(|e| ApiError::internal("Erro ao criar anúncio.", e))?,
        ),
        _ => None,
    };

    let created = Ad::create(pool, &ad, image.as_deref())
        .map_err(|e| ApiError::internal("Erro ao criar anúncio.", e))?;

    log::info!("Ad {} for slot '{}' created by '{}'", created.id, created.slot, admin.0.username);
    Ok((Status::Created, Json(created)))
}

#[get("/admin/ads")]
pub fn list_ads(_admin: AdminSession, pool: &State<DbPool>) -> Result<Json<Vec<Ad>>, ApiError> {
    Ad::list_all(pool)
        .map(Json)
        .map_err(|e| ApiError::internal("Erro ao listar anúncios.", e))
}

#[delete("/admin/ads/<id>")]
pub fn delete_ad(_admin: AdminSession, pool: &State<DbPool>, id: &str) -> Result<Status, ApiError> {
    let id = parse_id(id)?;

    let removed = Ad::delete(pool, id)
        .map_err(|e| ApiError::internal("Erro ao apagar anúncio.", e))?;
    if !removed {
        return Err(ApiError::not_found("Anúncio não encontrado."));
    }

    Ok(Status::NoContent)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![select_ad, create_ad, list_ads, delete_ad]
}
