use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Request, Response};

/// Adds CORS headers to every response.
///
/// With a configured origin, only that origin is allowed and credentials
/// (the session cookie) may be sent. Without one, any origin is allowed but
/// browsers will not attach cookies.
pub struct Cors {
    allowed_origin: Option<String>,
}

impl Cors {
    pub fn new(allowed_origin: Option<String>) -> Self {
        Cors { allowed_origin }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        match &self.allowed_origin {
            Some(origin) => {
                res.set_header(Header::new("Access-Control-Allow-Origin", origin.clone()));
                res.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
                res.set_header(Header::new("Vary", "Origin"));
            }
            None => {
                res.set_header(Header::new("Access-Control-Allow-Origin", "*"));
            }
        }

        res.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, DELETE, OPTIONS",
        ));
        let requested = req
            .headers()
            .get_one("Access-Control-Request-Headers")
            .unwrap_or("Content-Type");
        res.set_header(Header::new(
            "Access-Control-Allow-Headers",
            requested.to_string(),
        ));
    }
}
