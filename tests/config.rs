use handoff::{ConfigError, Route, Router};

struct CompileTest(Vec<(Route<&'static str>, Result<(), ConfigError>)>);

impl CompileTest {
    fn run(self) {
        let mut router = Router::new();
        for (i, (route, expected)) in self.0.into_iter().enumerate() {
            let got = router.insert(route);
            assert_eq!(got, expected, "unexpected result for insert {}", i);
        }
    }
}

fn conflict(with: &str) -> ConfigError {
    ConfigError::Conflict {
        with: with.to_owned(),
    }
}

#[test]
fn sibling_conflicts() {
    CompileTest(vec![
        (Route::new("/").handler("home"), Ok(())),
        (Route::index().handler("root index"), Err(conflict("/"))),
        (Route::new("/blog/*").handler("blog"), Ok(())),
        (Route::new("/blog/*"), Err(conflict("/blog/*"))),
        (Route::new("blog/*"), Err(conflict("/blog/*"))),
        (Route::new("/users/:id").handler("user"), Ok(())),
        (Route::new("/users/:name"), Err(conflict("/users/:id"))),
        (Route::new("/users/admin").handler("admin"), Ok(())),
        (Route::new("/users/:id/posts").handler("posts"), Ok(())),
    ])
    .run()
}

#[test]
fn nested_conflicts() {
    CompileTest(vec![
        (
            Route::new("/a").children([Route::new("b").handler("1"), Route::new("b").handler("2")]),
            Err(conflict("/a/b")),
        ),
        (
            Route::new("/x")
                .children([Route::new(":p").handler("1"), Route::new(":q").handler("2")]),
            Err(conflict("/x/:p")),
        ),
        (
            Route::new("/y").children([Route::index().handler("1"), Route::index().handler("2")]),
            Err(conflict("/y")),
        ),
        (
            Route::new("/b/*")
                .children([Route::new("x").handler("1"), Route::new("x").handler("2")]),
            Err(conflict("/b/x")),
        ),
    ])
    .run()
}

#[test]
fn layouts_are_exempt() {
    CompileTest(vec![
        (
            Route::layout().child(Route::new("a").handler("1")),
            Ok(()),
        ),
        (
            Route::layout().child(Route::new("b").handler("2")),
            Ok(()),
        ),
        // routes under two sibling layouts are never compared, the
        // earlier layout wins at match time
        (
            Route::new("/c").children([
                Route::layout().child(Route::new("d").handler("3")),
                Route::layout().child(Route::new("d").handler("4")),
            ]),
            Ok(()),
        ),
    ])
    .run()
}

#[test]
fn invalid_patterns() {
    CompileTest(vec![
        (Route::new("/a/*/b"), Err(ConfigError::InvalidSplat)),
        (Route::new("/a/x*"), Err(ConfigError::InvalidSplat)),
        (Route::new("/*splat"), Err(ConfigError::InvalidSplat)),
        (Route::new("/:"), Err(ConfigError::InvalidParam)),
        (Route::new("/user_:name"), Err(ConfigError::InvalidParam)),
        (Route::new("/:a:b"), Err(ConfigError::InvalidParam)),
        (Route::new("/:a*"), Err(ConfigError::InvalidParam)),
    ])
    .run()
}

#[test]
fn index_routes_stay_leaves() {
    CompileTest(vec![
        (
            Route::index().child(Route::new("x").handler("x")),
            Err(ConfigError::IndexWithChildren),
        ),
        (
            Route::new("/app").children([
                Route::index().handler("dash"),
                Route::new("teams/:team").handler("team").children([
                    Route::index().handler("team index"),
                    Route::new("members").handler("members"),
                ]),
            ]),
            Ok(()),
        ),
    ])
    .run()
}

#[test]
fn failed_insert_leaves_table_unchanged() {
    let mut router = Router::new();
    router.insert(Route::new("/ok").handler("ok")).unwrap();

    let bad = Route::new("/bad")
        .handler("bad")
        .children([Route::new("x").handler("1"), Route::new("x").handler("2")]);
    assert_eq!(router.insert(bad), Err(conflict("/bad/x")));

    assert!(router.at("/bad").is_err());
    assert_eq!(router.at("/ok").unwrap().handler(), Some(&"ok"));
}

#[test]
fn empty_router_matches_nothing() {
    let router = Router::<&str>::new();
    assert!(router.at("/").is_err());
    assert!(router.at("/anything").is_err());
}

#[cfg(feature = "serde")]
mod serde_config {
    use handoff::{ConfigError, Route, Router};

    #[test]
    fn route_table_from_json() {
        let routes: Vec<Route<String>> = serde_json::from_str(
            r#"[
                { "path": "/", "handler": "home" },
                { "path": "/blog", "children": [
                    { "index": true, "handler": "blog index" },
                    { "path": ":slug", "handler": "blog post" }
                ]}
            ]"#,
        )
        .unwrap();

        let router = Router::from_routes(routes).unwrap();
        assert_eq!(
            router.at("/blog").unwrap().handler(),
            Some(&"blog index".to_owned())
        );
        assert_eq!(
            router.at("/blog/intro").unwrap().params.get("slug"),
            Some("intro")
        );
    }

    #[test]
    fn index_with_path_rejected() {
        let route: Route<String> =
            serde_json::from_str(r#"{ "path": "/oops", "index": true, "handler": "x" }"#).unwrap();

        assert_eq!(
            Router::from_routes([route]).unwrap_err(),
            ConfigError::IndexWithPath
        );
    }
}
