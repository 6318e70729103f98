//! End-to-end HTTP flow over the in-memory adapters.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use rstest::rstest;
use serde_json::{Value, json};

use swapmeet::Trace;
use swapmeet::domain::ports::DEV_STAFF;
use swapmeet::domain::{AdService, CatalogService, DirectoryLoginService, ExchangeService};
use swapmeet::inbound::http::api_scope;
use swapmeet::inbound::http::state::HttpState;
use swapmeet::outbound::memory::MemoryStore;

fn in_memory_state() -> HttpState {
    let store = Arc::new(MemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ads = Arc::new(AdService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&clock),
    ));
    let catalog = Arc::new(CatalogService::new(Arc::clone(&store), vec![DEV_STAFF]));
    let exchanges = Arc::new(ExchangeService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        clock,
    ));
    HttpState {
        login: Arc::new(DirectoryLoginService::new(store)),
        ads: ads.clone(),
        ads_query: ads,
        catalog: catalog.clone(),
        catalog_query: catalog,
        exchanges: exchanges.clone(),
        exchanges_query: exchanges,
    }
}

async fn login<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": username, "password": "password" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login as {username}");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

async fn post_ad<S, B>(app: &S, cookie: &Cookie<'static>, title: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/ads")
            .cookie(cookie.clone())
            .set_json(json!({
                "title": title,
                "description": format!("{title}, barely used"),
                "categories": ["misc"],
                "condition": "used"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    test::read_body_json(res).await
}

fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

async fn send_json<S, B>(
    app: &S,
    req: test::TestRequest,
    cookie: &Cookie<'static>,
    body: Value,
) -> ServiceResponse<B>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    test::call_service(app, req.cookie(cookie.clone()).set_json(body).to_request()).await
}

#[rstest]
#[actix_web::test]
async fn staff_curate_the_catalog_that_ads_draw_from() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(in_memory_state()))
            .wrap(Trace)
            .service(api_scope().wrap(session_middleware())),
    )
    .await;
    let admin = login(&app, "admin").await;
    let alice = login(&app, "alice").await;
    let toys = json!({ "slug": "toys", "title": "Toys" });

    let res = send_json(
        &app,
        test::TestRequest::post().uri("/api/v1/categories"),
        &alice,
        toys.clone(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let ad_with_toys = json!({
        "title": "Kite",
        "description": "Two-line stunt kite",
        "categories": ["toys", "sport"],
        "condition": "like-new"
    });
    let res = send_json(
        &app,
        test::TestRequest::post().uri("/api/v1/ads"),
        &alice,
        ad_with_toys.clone(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let unknown: Value = test::read_body_json(res).await;
    assert_eq!(unknown["details"]["field"], "categories");
    assert_eq!(unknown["details"]["value"], "toys");

    let res = send_json(
        &app,
        test::TestRequest::post().uri("/api/v1/categories"),
        &admin,
        toys,
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send_json(
        &app,
        test::TestRequest::post().uri("/api/v1/ads"),
        &alice,
        ad_with_toys,
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    post_ad(&app, &alice, "Lamp").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/ads?category=toys")
            .cookie(alice.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let toys_only: Value = test::read_body_json(res).await;
    assert_eq!(toys_only.as_array().map(Vec::len), Some(1));
    assert_eq!(toys_only[0]["title"], "Kite");

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/v1/categories/toys")
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let in_use: Value = test::read_body_json(res).await;
    assert_eq!(in_use["code"], "conflict");
}

#[rstest]
#[actix_web::test]
async fn two_users_trade_through_the_api() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(in_memory_state()))
            .wrap(Trace)
            .service(api_scope().wrap(session_middleware())),
    )
    .await;

    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;
    let guitar = post_ad(&app, &alice, "Guitar").await;
    let bike = post_ad(&app, &bob, "Bike").await;
    let bob_id = bike["owner"].as_str().expect("owner id").to_owned();

    let proposal_body = json!({
        "senderAd": guitar["id"],
        "receiverAd": bike["id"],
        "comment": "hi"
    });
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/propose/{bob_id}"))
            .cookie(alice.clone())
            .set_json(&proposal_body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    assert_eq!(created["status"], "pending");
    assert_eq!(created["receiverAd"]["title"], "Bike");
    let exchange_id = created["id"].as_str().expect("proposal id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/propose/{bob_id}"))
            .cookie(alice.clone())
            .set_json(&proposal_body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.headers().contains_key("trace-id"));
    let duplicate: Value = test::read_body_json(res).await;
    assert_eq!(duplicate["code"], "conflict");
    assert!(duplicate.get("traceId").is_some());

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/exchanges/received?status=pending")
            .cookie(bob.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let received: Value = test::read_body_json(res).await;
    assert_eq!(received.as_array().map(Vec::len), Some(1));

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/exchanges/{exchange_id}"))
            .cookie(alice.clone())
            .set_json(json!({ "status": "rejected" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/exchanges/{exchange_id}"))
            .cookie(bob.clone())
            .set_json(json!({ "status": "accepted" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let accepted: Value = test::read_body_json(res).await;
    assert_eq!(accepted["status"], "accepted");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/v1/exchanges/sent?receiverUser={bob_id}&status=accepted"
            ))
            .cookie(alice.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let sent: Value = test::read_body_json(res).await;
    assert_eq!(sent[0]["id"], exchange_id.as_str());

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/exchanges/{exchange_id}"))
            .cookie(bob)
            .set_json(json!({ "status": "rejected" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let resolved: Value = test::read_body_json(res).await;
    assert_eq!(resolved["code"], "conflict");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(alice)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
