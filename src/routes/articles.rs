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
use crate::models::article::{Article, ArticleInput};
use crate::models::category::Category;
use crate::uploads::save_upload;

// ── Public reads ───────────────────────────────────────

#[get("/noticias?<categoria>")]
pub fn list_articles(pool: &State<DbPool>, categoria: Option<&str>) -> Result<Json<Vec<Article>>, ApiError> {
    let category = match non_empty(categoria) {
        Some(raw) => Some(
            raw.parse::<Category>()
                .map_err(|_| ApiError::validation("Categoria inválida."))?,
        ),
        None => None,
    };

    Article::list(pool, category)
        .map(Json)
        .map_err(|e| ApiError::internal("Erro ao listar notícias.", e))
}

#[get("/noticias/<id>")]
pub fn get_article(pool: &State<DbPool>, id: &str) -> Result<Json<Article>, ApiError> {
    let id = parse_id(id)?;

    Article::find_by_id(pool, id)
        .map_err(|e| ApiError::internal("Erro ao buscar notícia.", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Notícia não encontrada."))
}

// ── Admin writes ───────────────────────────────────────

#[derive(FromForm)]
pub struct ArticleUpload<'f> {
    #[field(name = "titulo")]
    pub title: Option<String>,
    #[field(name = "resumo")]
    pub summary: Option<String>,
    #[field(name = "conteudo")]
    pub body: Option<String>,
    #[field(name = "categoria")]
    pub category: Option<String>,
    #[field(name = "imagem")]
    pub image: Option<TempFile<'f>>,
}

#[post("/noticias", data = "<form>")]
pub async fn create_article(
    admin: AdminSession,
    pool: &State<DbPool>,
    config: &State<AppConfig>,
    mut form: Form<ArticleUpload<'_>>,
) -> Result<(Status, Json<Article>), ApiError> {
    let article = ArticleInput {
        title: form.title.take(),
        summary: form.summary.take(),
        body: form.body.take(),
        category: form.category.take(),
    }
    .validate()?;

    let image = match form.image.as_mut() {
        Some(f) if f.len() > 0 => Some(
            save_upload(f, &config.uploads_dir)
                .await
                .map_err(|e| ApiError::internal("Erro ao criar notícia.", e))?,
        ),
        _ => None,
    };

    let created = Article::create(pool, &article, image.as_deref())
        .map_err(|e| ApiError::internal("Erro ao criar notícia.", e))?;

    log::info!("Article {} created by '{}'", created.id, admin.0.username);
    Ok((Status::Created, Json(created)))
}

#[delete("/noticias/<id>")]
pub fn delete_article(_admin: AdminSession, pool: &State<DbPool>, id: &str) -> Result<Status, ApiError> {
    let id = parse_id(id)?;

    let removed = Article::delete(pool, id)
        .map_err(|e| ApiError::internal("Erro ao apagar notícia.", e))?;
    if !removed {
        return Err(ApiError::not_found("Notícia não encontrada."));
    }

    Ok(Status::NoContent)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_articles, get_article, create_article, delete_article]
}
