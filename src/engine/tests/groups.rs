//! Tests for route groups and prefix-scoped middleware

use super::*;
use crate::{GroupId, HandlerFunc};
use http::{Method, StatusCode};

fn ok(ctx: &mut Context) {
    ctx.string(StatusCode::OK, "ok");
}

#[test]
fn test_group_prefixes_compose() {
    let mut engine = create_test_engine();
    let (v1_id, admin_id) = {
        let mut v1 = engine.group("/v1");
        let v1_id = v1.id();
        let admin = v1.group("/admin");
        assert_eq!(admin.prefix(), "/v1/admin");
        assert_eq!(admin.parent(), Some(v1_id));
        (v1_id, admin.id())
    };

    assert_eq!(
        engine.group_prefixes().collect::<Vec<_>>(),
        vec!["", "/v1", "/v1/admin"]
    );
    assert_eq!(engine.root().prefix(), "");
    assert_eq!(engine.root().parent(), None);
    assert_eq!(engine.root().id(), GroupId::ROOT);
    assert_ne!(v1_id, admin_id);
}

#[test]
fn test_group_routes_are_prefixed() {
    let mut engine = create_test_engine();
    {
        let mut v1 = engine.group("/v1");
        v1.get("/hello", ok);
        v1.group("/admin").get("/users/:id", |ctx: &mut Context| {
            let id = ctx.param("id").unwrap_or_default().to_owned();
            ctx.string(StatusCode::OK, id);
        });
    }

    assert_eq!(run(&engine, Method::GET, "/v1/hello").status_code(), StatusCode::OK);
    assert_eq!(run(&engine, Method::GET, "/hello").status_code(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(&run(&engine, Method::GET, "/v1/admin/users/7")), "7");
}

#[test]
fn test_middleware_accumulates_along_prefixes() {
    let trace = new_trace();
    let mut engine = create_test_engine();
    engine.use_middleware(mark(&trace, "A"));
    engine.get("/other", ok);
    {
        let mut api = engine.group("/api");
        api.use_middleware(mark(&trace, "B"));
        let mut v1 = api.group("/v1");
        v1.use_middleware(mark(&trace, "C"));
        v1.get("/x", ok);
    }

    run(&engine, Method::GET, "/api/v1/x");
    assert_eq!(entries(&trace), vec!["A", "B", "C"]);

    trace.lock().unwrap().clear();
    run(&engine, Method::GET, "/other");
    assert_eq!(entries(&trace), vec!["A"]);
}

#[test]
fn test_prefix_match_is_textual() {
    let trace = new_trace();
    let mut engine = create_test_engine();
    engine.get("/apiary", ok);
    engine.group("/api").use_middleware(mark(&trace, "api"));

    run(&engine, Method::GET, "/apiary");
    assert_eq!(entries(&trace), vec!["api"]);
}

#[test]
fn test_middleware_follows_group_creation_order() {
    let trace = new_trace();
    let mut engine = create_test_engine();
    let inner_id = {
        let mut outer = engine.group("/a");
        outer.group("/b").id()
    };
    // The outer group's middleware is added after the inner group exists,
    // but the outer group was created first.
    engine
        .group_mut(inner_id)
        .unwrap()
        .use_middleware(mark(&trace, "inner"))
        .get("/x", ok);
    engine
        .group_mut(GroupId(1))
        .unwrap()
        .use_middleware(mark(&trace, "outer"));

    run(&engine, Method::GET, "/a/b/x");
    assert_eq!(entries(&trace), vec!["outer", "inner"]);
}

#[test]
fn test_group_mut_unknown_id() {
    let mut engine = create_test_engine();
    assert!(engine.group_mut(GroupId(42)).is_none());
    assert!(engine.group_mut(GroupId::ROOT).is_some());
}

#[test]
fn test_middlewares_for() {
    let mut engine = create_test_engine();
    engine.use_middleware(|ctx: &mut Context| ctx.next());
    engine
        .group("/v2")
        .use_middleware(|ctx: &mut Context| ctx.next())
        .use_middleware(|ctx: &mut Context| ctx.next());

    assert_eq!(engine.middlewares_for("/v2/hello").len(), 3);
    assert_eq!(engine.middlewares_for("/v1/hello").len(), 1);
}

#[test]
fn test_group_middleware_can_reject() {
    let mut engine = create_test_engine();
    {
        let mut v2 = engine.group("/v2");
        v2.use_middleware(|ctx: &mut Context| {
            ctx.fail(StatusCode::FORBIDDEN, "v2 is closed");
        });
        v2.get("/hello/:name", ok);
    }
    engine.get("/v1/hello", ok);

    let ctx = run(&engine, Method::GET, "/v2/hello/geektutu");
    assert_eq!(ctx.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(&ctx), r#"{"message":"v2 is closed"}"#);

    assert_eq!(run(&engine, Method::GET, "/v1/hello").status_code(), StatusCode::OK);
}

#[test]
fn test_all_method_helpers_register() {
    let mut engine = create_test_engine();
    {
        let mut items = engine.group("/items");
        items
            .get("/:id", ok)
            .post("/:id", ok)
            .put("/:id", ok)
            .delete("/:id", ok)
            .patch("/:id", ok)
            .add_route(Method::OPTIONS, "/:id", ok);
    }

    for method in [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
    ] {
        let ctx = run(&engine, method.clone(), "/items/3");
        assert_eq!(ctx.status_code(), StatusCode::OK, "{method}");
    }
    assert_eq!(
        run(&engine, Method::HEAD, "/items/3").status_code(),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn test_slash_group_applies_everywhere() {
    let trace = new_trace();
    let mut engine = create_test_engine();
    engine.group("/").use_middleware(mark(&trace, "A"));
    engine.group("/api").use_middleware(mark(&trace, "B"));
    engine.group("/api/v1").use_middleware(mark(&trace, "C"));
    engine.get("/api/v1/users", ok).get("/other", ok);

    run(&engine, Method::GET, "/api/v1/users");
    assert_eq!(entries(&trace), vec!["A", "B", "C"]);

    trace.lock().unwrap().clear();
    run(&engine, Method::GET, "/other");
    assert_eq!(entries(&trace), vec!["A"]);
}

#[test]
fn test_use_middlewares_appends_in_order() {
    let trace = new_trace();
    let mut engine = create_test_engine();
    engine.use_middlewares([
        Arc::new(mark(&trace, "A")) as HandlerFunc,
        Arc::new(mark(&trace, "B")) as HandlerFunc,
    ]);
    engine
        .group("/api")
        .use_middlewares(vec![
            Arc::new(mark(&trace, "C")) as HandlerFunc,
            Arc::new(mark(&trace, "D")) as HandlerFunc,
        ])
        .get("/x", ok);

    run(&engine, Method::GET, "/api/x");
    assert_eq!(entries(&trace), vec!["A", "B", "C", "D"]);
}
