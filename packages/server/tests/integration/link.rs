use crate::common::{TestApp, routes};
use serde_json::json;

/// One user with one project; returns (token, project_id).
async fn setup(app: &TestApp) -> (String, i32) {
    let token = app.register_and_login("alice").await;
    let res = app
        .post_with_token(routes::PROJECTS, &json!({"name": "Garage"}), &token)
        .await;
    assert_eq!(res.status, 201, "project setup failed: {}", res.text);
    (token, res.id())
}

async fn create_component(app: &TestApp, token: &str, code: &str, amps: i32) -> i32 {
    let body = json!({
        "code": code,
        "brand": "ACME",
        "name": format!("{amps}A breaker"),
        "amperage_rating": amps,
        "voltage": 230,
    });
    let res = app.post_with_token(routes::COMPONENTS, &body, token).await;
    assert_eq!(res.status, 201, "component setup failed: {}", res.text);
    res.id()
}

mod adding {
    use super::*;

    #[tokio::test]
    async fn links_a_component_by_id_with_default_quantity() {
        let app = TestApp::spawn().await;
        let (token, project_id) = setup(&app).await;
        let component_id = create_component(&app, &token, "CB-20A", 20).await;

        let res = app
            .post_with_token(
                &routes::project_components(project_id),
                &json!({"component_id": component_id}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["quantity"], 1);
        assert_eq!(res.body["total_amperage"], 20);
        assert_eq!(res.body["code"], "CB-20A");
    }

    #[tokio::test]
    async fn links_a_component_by_code() {
        let app = TestApp::spawn().await;
        let (token, project_id) = setup(&app).await;
        create_component(&app, &token, "CB-20A", 20).await;

        let res = app
            .post_with_token(
                &routes::project_components(project_id),
                &json!({"code": "CB-20A", "quantity": 3}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["quantity"], 3);
        assert_eq!(res.body["total_amperage"], 60);
    }

    #[tokio::test]
    async fn adding_again_merges_quantities() {
        let app = TestApp::spawn().await;
        let (token, project_id) = setup(&app).await;
        let component_id = create_component(&app, &token, "CB-20A", 20).await;

        let res = app
            .post_with_token(
                &routes::project_components(project_id),
                &json!({"component_id": component_id, "quantity": 2}),
                &token,
            )
            .await;
        assert_eq!(res.status, 201);

        let res = app
            .post_with_token(
                &routes::project_components(project_id),
                &json!({"component_id": component_id, "quantity": 3}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["quantity"], 5);
        assert_eq!(res.body["total_amperage"], 100);

        // Still one link, not two.
        let res = app
            .get_with_token(&routes::project_components(project_id), &token)
            .await;
        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_zero_quantity() {
        let app = TestApp::spawn().await;
        let (token, project_id) = setup(&app).await;
        let component_id = create_component(&app, &token, "CB-20A", 20).await;

        let res = app
            .post_with_token(
                &routes::project_components(project_id),
                &json!({"component_id": component_id, "quantity": 0}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_negative_quantity() {
        let app = TestApp::spawn().await;
        let (token, project_id) = setup(&app).await;
        let component_id = create_component(&app, &token, "CB-20A", 20).await;

        let res = app
            .post_with_token(
                &routes::project_components(project_id),
                &json!({"component_id": component_id, "quantity": -2}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn rejects_both_id_and_code() {
        let app = TestApp::spawn().await;
        let (token, project_id) = setup(&app).await;
        let component_id = create_component(&app, &token, "CB-20A", 20).await;

        let res = app
            .post_with_token(
                &routes::project_components(project_id),
                &json!({"component_id": component_id, "code": "CB-20A"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_component_is_404() {
        let app = TestApp::spawn().await;
        let (token, project_id) = setup(&app).await;

        let res = app
            .post_with_token(
                &routes::project_components(project_id),
                &json!({"component_id": 9999}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn cannot_link_someone_elses_component() {
        let app = TestApp::spawn().await;
        let (token, project_id) = setup(&app).await;
        let bob = app.register_and_login("bob").await;
        let bob_component = create_component(&app, &bob, "CB-B", 16).await;

        let res = app
            .post_with_token(
                &routes::project_components(project_id),
                &json!({"component_id": bob_component}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn totals_are_quantity_weighted_sums() {
        let app = TestApp::spawn().await;
        let (token, project_id) = setup(&app).await;
        let breaker = create_component(&app, &token, "CB-20A", 20).await;
        let relay = create_component(&app, &token, "RLY-2A", 2).await;

        app.post_with_token(
            &routes::project_components(project_id),
            &json!({"component_id": breaker, "quantity": 2}),
            &token,
        )
        .await;
        app.post_with_token(
            &routes::project_components(project_id),
            &json!({"component_id": relay, "quantity": 5}),
            &token,
        )
        .await;

        let res = app
            .get_with_token(&routes::project_components(project_id), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
        // 20*2 + 2*5
        assert_eq!(res.body["total_amperage"], 50);

        // The project detail reports the same total.
        let res = app.get_with_token(&routes::project(project_id), &token).await;
        assert_eq!(res.body["total_amperage"], 50);
    }
}

mod removing {
    use super::*;

    /// Returns (token, project_id, component_id) with a quantity-5 link.
    async fn setup_link(app: &TestApp) -> (String, i32, i32) {
        let (token, project_id) = setup(app).await;
        let component_id = create_component(app, &token, "CB-20A", 20).await;
        let res = app
            .post_with_token(
                &routes::project_components(project_id),
                &json!({"component_id": component_id, "quantity": 5}),
                &token,
            )
            .await;
        assert_eq!(res.status, 201);
        (token, project_id, component_id)
    }

    #[tokio::test]
    async fn partial_removal_decrements_the_link() {
        let app = TestApp::spawn().await;
        let (token, project_id, component_id) = setup_link(&app).await;

        let res = app
            .delete_with_token(
                &routes::project_component_qty(project_id, component_id, 2),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["quantity"], 3);
        assert_eq!(res.body["total_amperage"], 60);
    }

    #[tokio::test]
    async fn removing_the_exact_quantity_deletes_the_link() {
        let app = TestApp::spawn().await;
        let (token, project_id, component_id) = setup_link(&app).await;

        let res = app
            .delete_with_token(
                &routes::project_component_qty(project_id, component_id, 5),
                &token,
            )
            .await;
        assert_eq!(res.status, 204);

        let res = app
            .get_with_token(&routes::project_components(project_id), &token)
            .await;
        assert_eq!(res.body["data"].as_array().unwrap().len(), 0);
        assert_eq!(res.body["total_amperage"], 0);
    }

    #[tokio::test]
    async fn removing_more_than_linked_fails() {
        let app = TestApp::spawn().await;
        let (token, project_id, component_id) = setup_link(&app).await;

        let res = app
            .delete_with_token(
                &routes::project_component_qty(project_id, component_id, 6),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        // Link untouched.
        let res = app
            .get_with_token(&routes::project_components(project_id), &token)
            .await;
        assert_eq!(res.body["data"][0]["quantity"], 5);
    }

    #[tokio::test]
    async fn removing_without_quantity_deletes_the_link() {
        let app = TestApp::spawn().await;
        let (token, project_id, component_id) = setup_link(&app).await;

        let res = app
            .delete_with_token(&routes::project_component(project_id, component_id), &token)
            .await;
        assert_eq!(res.status, 204);

        let res = app
            .get_with_token(&routes::project_components(project_id), &token)
            .await;
        assert_eq!(res.body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn rejects_zero_removal_quantity() {
        let app = TestApp::spawn().await;
        let (token, project_id, component_id) = setup_link(&app).await;

        let res = app
            .delete_with_token(
                &routes::project_component_qty(project_id, component_id, 0),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn removing_an_absent_link_is_404() {
        let app = TestApp::spawn().await;
        let (token, project_id) = setup(&app).await;
        let component_id = create_component(&app, &token, "CB-20A", 20).await;

        let res = app
            .delete_with_token(&routes::project_component(project_id, component_id), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
