use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::app_helper::{role_named, setup_app};
use crate::common::request::{create_request, response_json};
use crate::common::test_data::screen_entry;

#[tokio::test]
async fn test_can_manage_by_name_and_id() {
    let (app, _state, roles) = setup_app().await;
    let clinic_admin = role_named(&roles, "Clinic Admin");

    let cases = [
        (json!({ "by_name": "Administrator" }), json!({ "by_name": "Clinic Admin" }), true),
        (json!({ "by_id": clinic_admin.id }), json!({ "by_name": "Administrator" }), false),
        (json!({ "by_id": clinic_admin.id }), json!({ "by_id": clinic_admin.id }), false),
        (json!({ "by_id": Uuid::new_v4() }), json!({ "by_name": "Receptionist" }), false),
    ];

    for (actor_role, target_role, expected) in cases {
        let body = json!({ "actor_role": actor_role, "target_role": target_role });
        let response = app
            .clone()
            .oneshot(create_request("POST", "/access/can-manage", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["data"]["allowed"], expected, "{}", body);
    }
}

#[tokio::test]
async fn test_assignable_roles_for_clinic_admin() {
    let (app, _state, roles) = setup_app().await;
    let clinic_admin = role_named(&roles, "Clinic Admin");

    let body = json!({
        "actor": { "id": Uuid::new_v4(), "role_id": clinic_admin.id, "clinic_ids": [Uuid::new_v4()] }
    });
    let response = app
        .oneshot(create_request("POST", "/access/assignable-roles", &body))
        .await
        .unwrap();

    let json = response_json(response).await;
    let names: Vec<&str> = json["data"]["roles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|role| role["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Veterinarian", "Receptionist"]);
    assert_eq!(json["data"]["can_create_user"], true);
}

#[tokio::test]
async fn test_visible_users_filters_by_hierarchy_and_scope() {
    let (app, _state, roles) = setup_app().await;
    let clinic = Uuid::new_v4();
    let other_clinic = Uuid::new_v4();
    let clinic_admin = role_named(&roles, "Clinic Admin");
    let vet = role_named(&roles, "Veterinarian");
    let super_admin = role_named(&roles, "Super Admin");

    let visible_vet = Uuid::new_v4();
    let body = json!({
        "actor": { "id": Uuid::new_v4(), "role_id": clinic_admin.id, "clinic_ids": [clinic] },
        "users": [
            { "id": visible_vet, "role_id": vet.id, "clinic_id": clinic },
            { "id": Uuid::new_v4(), "role_id": vet.id, "clinic_id": other_clinic },
            { "id": Uuid::new_v4(), "role_id": clinic_admin.id, "clinic_id": clinic },
            { "id": Uuid::new_v4(), "role_id": super_admin.id, "clinic_id": clinic }
        ]
    });
    let response = app
        .oneshot(create_request("POST", "/access/visible-users", &body))
        .await
        .unwrap();

    let json = response_json(response).await;
    let data = &json["data"];
    assert_eq!(data["total_count"].as_u64().unwrap(), 1);
    assert_eq!(data["users"][0]["id"], visible_vet.to_string());
    assert_eq!(
        data["users"][0]["actions"],
        json!({ "can_view": true, "can_edit": true, "can_delete": true })
    );
}

#[tokio::test]
async fn test_visible_users_empty_without_clinics() {
    let (app, _state, roles) = setup_app().await;
    let clinic_admin = role_named(&roles, "Clinic Admin");
    let vet = role_named(&roles, "Veterinarian");

    let body = json!({
        "actor": { "id": Uuid::new_v4(), "role_id": clinic_admin.id, "clinic_ids": [] },
        "users": [{ "id": Uuid::new_v4(), "role_id": vet.id, "clinic_id": Uuid::new_v4() }]
    });
    let response = app
        .oneshot(create_request("POST", "/access/visible-users", &body))
        .await
        .unwrap();

    let json = response_json(response).await;
    assert_eq!(json["data"]["total_count"].as_u64().unwrap(), 0);
    assert_eq!(json["data"]["warnings"], json!(["missing_scope"]));
}

#[tokio::test]
async fn test_screen_check() {
    let (app, state, roles) = setup_app().await;
    let clinic = Uuid::new_v4();
    let vet = role_named(&roles, "Veterinarian");

    state.screen_access.write().await.insert(
        clinic,
        vec![screen_entry(clinic, "Veterinarian", "Inventory", true)],
    );

    for (screen_name, expected) in [("inventory", true), ("Suppliers", false)] {
        let body = json!({
            "actor": { "id": Uuid::new_v4(), "role_id": vet.id, "clinic_ids": [clinic] },
            "screen_name": screen_name
        });
        let response = app
            .clone()
            .oneshot(create_request("POST", "/access/screens/check", &body))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["data"]["enabled"], expected);
        assert_eq!(json["data"]["access"]["mode"], "restricted");
    }
}

#[tokio::test]
async fn test_user_assignment_validation() {
    let (app, _state, roles) = setup_app().await;
    let clinic = Uuid::new_v4();
    let clinic_admin = role_named(&roles, "Clinic Admin");
    let vet = role_named(&roles, "Veterinarian");
    let actor = json!({ "id": Uuid::new_v4(), "role_id": clinic_admin.id, "clinic_ids": [clinic] });

    let valid = json!({
        "actor": actor,
        "target_role": { "by_name": "Veterinarian" },
        "clinic_ids": [clinic]
    });
    let response = app
        .clone()
        .oneshot(create_request("POST", "/access/user-assignment/validate", &valid))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["data"]["valid"], true);
    assert_eq!(json["data"]["role_id"], vet.id.to_string());

    let cases = [
        (json!({ "by_name": "Veterinarian" }), json!([]), StatusCode::BAD_REQUEST),
        (json!({ "by_name": "Veterinarian" }), json!([Uuid::new_v4()]), StatusCode::FORBIDDEN),
        (json!({ "by_name": "Administrator" }), json!([clinic]), StatusCode::FORBIDDEN),
        (json!({ "by_id": Uuid::new_v4() }), json!([clinic]), StatusCode::NOT_FOUND),
    ];
    for (target_role, clinic_ids, expected) in cases {
        let body = json!({ "actor": actor, "target_role": target_role, "clinic_ids": clinic_ids });
        let response = app
            .clone()
            .oneshot(create_request("POST", "/access/user-assignment/validate", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), expected, "{}", body);
    }
}
