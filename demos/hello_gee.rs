//! Hello Gee
//!
//! Routes, groups, captures and middleware in one small server.
//!
//! Run with:
//! ```bash
//! RUST_ENV=dev cargo run --example hello_gee
//! ```
//!
//! Then test:
//! ```bash
//! curl http://localhost:3000/
//! curl http://localhost:3000/v1/hello/geektutu
//! curl http://localhost:3000/v2/hello/geektutu
//! curl -H 'Authorization: Bearer t' http://localhost:3000/v2/hello/geektutu
//! curl http://localhost:3000/assets/css/geektutu.css
//! curl -d 'username=geektutu&password=1234' http://localhost:3000/login
//! curl http://localhost:3000/panic
//! ```

use gee::{Config, Context, Engine, Result};
use http::StatusCode;
use serde::Serialize;

#[derive(Serialize)]
struct Login {
    username: String,
    password_len: usize,
}

fn login(ctx: &mut Context) {
    let username = ctx.post_form("username").unwrap_or_default();
    let password = ctx.post_form("password").unwrap_or_default();
    ctx.json(
        StatusCode::OK,
        &Login {
            username,
            password_len: password.len(),
        },
    );
}

fn hello(ctx: &mut Context) {
    let body = format!(
        "hello {}, you're at {}\n",
        ctx.param("name").unwrap_or_default(),
        ctx.path()
    );
    ctx.string(StatusCode::OK, body);
}

fn require_token(ctx: &mut Context) {
    if ctx.header("authorization").is_none() {
        ctx.fail(StatusCode::UNAUTHORIZED, "missing authorization header");
        return;
    }
    ctx.next();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::default();
    config.setup_tracing();

    let mut engine = Engine::with_config(config)?;
    engine
        .use_middleware(gee::logger())
        .use_middleware(gee::recovery());

    engine
        .get("/", |ctx: &mut Context| {
            ctx.html(StatusCode::OK, "<h1>Hello Gee</h1>\n");
        })
        .get("/assets/*filepath", |ctx: &mut Context| {
            let filepath = ctx.param("filepath").unwrap_or_default().to_owned();
            ctx.json(StatusCode::OK, &serde_json::json!({ "filepath": filepath }));
        })
        .get("/panic", |_: &mut Context| {
            let names = vec!["geektutu"];
            println!("{}", names[100]);
        })
        .post("/login", login);

    engine.group("/v1").get("/hello/:name", hello);

    let mut v2 = engine.group("/v2");
    v2.use_middleware(require_token);
    v2.get("/hello/:name", hello);

    engine.run().await
}
