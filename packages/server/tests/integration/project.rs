use crate::common::{TestApp, routes};
use serde_json::json;

async fn create_project(app: &TestApp, token: &str, name: &str) -> i32 {
    let res = app
        .post_with_token(routes::PROJECTS, &json!({"name": name}), token)
        .await;
    assert_eq!(res.status, 201, "create_project failed: {}", res.text);
    res.id()
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn creates_a_project() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;

        let res = app
            .post_with_token(routes::PROJECTS, &json!({"name": "Garage wiring"}), &token)
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["name"], "Garage wiring");
        assert!(res.body["id"].as_i64().is_some());
        assert!(res.body["created_at"].as_str().is_some());
    }

    #[tokio::test]
    async fn rejects_duplicate_name_for_same_owner() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;
        create_project(&app, &token, "Garage").await;

        let res = app
            .post_with_token(routes::PROJECTS, &json!({"name": "Garage"}), &token)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn same_name_is_fine_for_another_owner() {
        let app = TestApp::spawn().await;
        let alice = app.register_and_login("alice").await;
        let bob = app.register_and_login("bob").await;
        create_project(&app, &alice, "Garage").await;

        let res = app
            .post_with_token(routes::PROJECTS, &json!({"name": "Garage"}), &bob)
            .await;

        assert_eq!(res.status, 201);
    }

    #[tokio::test]
    async fn rejects_blank_name() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;

        let res = app
            .post_with_token(routes::PROJECTS, &json!({"name": "   "}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::PROJECTS, &json!({"name": "Garage"}))
            .await;

        assert_eq!(res.status, 401);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn lists_only_own_projects() {
        let app = TestApp::spawn().await;
        let alice = app.register_and_login("alice").await;
        let bob = app.register_and_login("bob").await;
        create_project(&app, &alice, "Garage").await;
        create_project(&app, &alice, "Shed").await;
        create_project(&app, &bob, "Workshop").await;

        let res = app.get_with_token(routes::PROJECTS, &alice).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 2);
        let names: Vec<&str> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"Garage"));
        assert!(names.contains(&"Shed"));
    }

    #[tokio::test]
    async fn sorts_by_name_ascending() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;
        create_project(&app, &token, "Zulu").await;
        create_project(&app, &token, "Alpha").await;

        let res = app
            .get_with_token(
                &format!("{}?sort_by=name&sort_order=asc", routes::PROJECTS),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"][0]["name"], "Alpha");
        assert_eq!(res.body["data"][1]["name"], "Zulu");
    }

    #[tokio::test]
    async fn rejects_unknown_sort_column() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;

        let res = app
            .get_with_token(&format!("{}?sort_by=owner", routes::PROJECTS), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn paginates_results() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;
        for i in 0..5 {
            create_project(&app, &token, &format!("Project {i}")).await;
        }

        let res = app
            .get_with_token(&format!("{}?page=2&per_page=2", routes::PROJECTS), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["pagination"]["total"], 5);
        assert_eq!(res.body["pagination"]["total_pages"], 3);
    }
}

mod fetching {
    use super::*;

    #[tokio::test]
    async fn returns_project_with_empty_links() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;
        let id = create_project(&app, &token, "Garage").await;

        let res = app.get_with_token(&routes::project(id), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Garage");
        assert_eq!(res.body["components"].as_array().unwrap().len(), 0);
        assert_eq!(res.body["total_amperage"], 0);
    }

    #[tokio::test]
    async fn someone_elses_project_reads_as_404() {
        let app = TestApp::spawn().await;
        let alice = app.register_and_login("alice").await;
        let bob = app.register_and_login("bob").await;
        let id = create_project(&app, &alice, "Garage").await;

        let res = app.get_with_token(&routes::project(id), &bob).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod updating {
    use super::*;

    #[tokio::test]
    async fn renames_a_project() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;
        let id = create_project(&app, &token, "Garage").await;

        let res = app
            .patch_with_token(&routes::project(id), &json!({"name": "Garage v2"}), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Garage v2");
    }

    #[tokio::test]
    async fn rejects_rename_onto_existing_name() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;
        create_project(&app, &token, "Garage").await;
        let id = create_project(&app, &token, "Shed").await;

        let res = app
            .patch_with_token(&routes::project(id), &json!({"name": "Garage"}), &token)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn empty_payload_returns_current_project() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;
        let id = create_project(&app, &token, "Garage").await;

        let res = app.patch_with_token(&routes::project(id), &json!({}), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Garage");
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn deletes_a_project_and_its_links() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;
        let project_id = create_project(&app, &token, "Garage").await;

        let res = app
            .post_with_token(
                routes::COMPONENTS,
                &json!({"code": "CB-20A", "brand": "ACME", "name": "breaker",
                        "amperage_rating": 20, "voltage": 230}),
                &token,
            )
            .await;
        let component_id = res.id();
        let res = app
            .post_with_token(
                &routes::project_components(project_id),
                &json!({"component_id": component_id}),
                &token,
            )
            .await;
        assert_eq!(res.status, 201);

        let res = app.delete_with_token(&routes::project(project_id), &token).await;
        assert_eq!(res.status, 204);

        let res = app.get_with_token(&routes::project(project_id), &token).await;
        assert_eq!(res.status, 404);

        // The component survives and is unlinked, so it can be deleted.
        let res = app.delete_with_token(&routes::component(component_id), &token).await;
        assert_eq!(res.status, 204);
    }

    #[tokio::test]
    async fn deleting_a_missing_project_is_404() {
        let app = TestApp::spawn().await;
        let token = app.register_and_login("alice").await;

        let res = app.delete_with_token(&routes::project(9999), &token).await;

        assert_eq!(res.status, 404);
    }
}
