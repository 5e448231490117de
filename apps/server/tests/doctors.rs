//! Doctor endpoint tests
//!
//! Covers listing with pagination and ordering, creation with get-or-create of
//! rooms, specializations and districts, reads, partial updates and deletes.

#[allow(unused)]
mod support;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use support::{
    assert_error_body, assert_status, column, doctor, json_body, page_meta, to_json_body,
    with_test_app, with_test_app_with_config, DoctorBuilder, TestApp,
};
use uuid::Uuid;

async fn seed_doctors(app: &TestApp, n: usize) -> anyhow::Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(n);
    for i in 1..=n {
        ids.push(app.create("/doctors", &doctor(&format!("Doctor {i:02}"))).await?);
    }
    Ok(ids)
}

async fn patch(app: &TestApp, id: Uuid, body: Value) -> anyhow::Result<StatusCode> {
    let (status, _headers, _body) = app
        .request(
            Method::PATCH,
            &format!("/doctors/{id}"),
            Some(to_json_body(&body)?),
        )
        .await?;
    Ok(status)
}

#[tokio::test]
async fn create_returns_created_with_location_and_empty_body() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, headers, body) = app
                .request(
                    Method::POST,
                    "/doctors",
                    Some(to_json_body(&doctor("Gregory House"))?),
                )
                .await?;

            assert_status(status, StatusCode::CREATED, "create doctor");
            assert!(body.is_empty(), "create returns no body");
            let id = support::location_id(&headers)?;

            let details = app.get_json(&format!("/doctors/{id}")).await?;
            assert_eq!(details["id"], id.to_string());
            assert!(details["roomId"].is_string());
            assert!(details["specializationId"].is_string());
            assert!(details["districtId"].is_null());

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn second_page_of_twenty_five() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let ids = seed_doctors(app, 25).await?;

            let page = app.get_json("/doctors?count=10&page=2").await?;
            assert_eq!(page_meta(&page), (25, 3, true, true));

            let expected: Vec<Value> = ids[10..20].iter().map(|id| json!(id)).collect();
            let actual: Vec<Value> = column(&page, "doctors", "id").into_iter().cloned().collect();
            assert_eq!(actual, expected);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn first_and_last_page_flags() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            seed_doctors(app, 25).await?;

            let first = app.get_json("/doctors?count=10&page=1").await?;
            assert_eq!(page_meta(&first), (25, 3, false, true));

            let last = app.get_json("/doctors?count=10&page=3").await?;
            assert_eq!(page_meta(&last), (25, 3, true, false));
            assert_eq!(column(&last, "doctors", "id").len(), 5);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn pages_concatenate_to_the_whole_collection() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let ids = seed_doctors(app, 25).await?;

            let mut seen = Vec::new();
            for page in 1..=4 {
                let body = app
                    .get_json(&format!("/doctors?orderBy=room&count=7&page={page}"))
                    .await?;
                seen.extend(column(&body, "doctors", "id").into_iter().cloned());
            }

            // every doctor shares room 101, so ties fall back to insertion order
            let expected: Vec<Value> = ids.iter().map(|id| json!(id)).collect();
            assert_eq!(seen, expected);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn page_past_the_end_is_empty() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            seed_doctors(app, 3).await?;

            let page = app.get_json("/doctors?count=10&page=5").await?;
            assert!(column(&page, "doctors", "id").is_empty());
            assert_eq!(page_meta(&page), (3, 1, true, true));

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn list_items_carry_reference_values() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let body = DoctorBuilder::new("Lisa Cuddy")
                .room(12)
                .specialization("Endocrinologist")
                .district(4)
                .build();
            let id = app.create("/doctors", &body).await?;

            let page = app.get_json("/doctors?count=10&page=1").await?;
            assert_eq!(
                page["doctors"][0],
                json!({
                    "id": id,
                    "fullName": "Lisa Cuddy",
                    "room": 12,
                    "specialization": "Endocrinologist",
                    "district": 4,
                })
            );

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn order_by_full_name_is_case_insensitive() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            for name in ["Charlie", "Alice", "Bob"] {
                app.create("/doctors", &doctor(name)).await?;
            }

            let page = app
                .get_json("/doctors?orderBy=FULLNAME&count=10&page=1")
                .await?;
            assert_eq!(
                column(&page, "doctors", "fullName"),
                vec!["Alice", "Bob", "Charlie"]
            );

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn order_by_district_lists_missing_district_first() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            app.create("/doctors", &DoctorBuilder::new("A").district(3).build())
                .await?;
            app.create("/doctors", &DoctorBuilder::new("B").build()).await?;
            app.create("/doctors", &DoctorBuilder::new("C").district(1).build())
                .await?;

            let page = app
                .get_json("/doctors?orderBy=district&count=10&page=1")
                .await?;
            assert_eq!(column(&page, "doctors", "fullName"), vec!["B", "C", "A"]);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn unknown_order_by_matches_unordered_listing() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            for (name, room) in [("Zed", 3), ("Amy", 1), ("Kim", 2)] {
                app.create("/doctors", &DoctorBuilder::new(name).room(room).build())
                    .await?;
            }

            let unordered = app.get_json("/doctors?count=10&page=1").await?;
            let unknown = app
                .get_json("/doctors?orderBy=salary&count=10&page=1")
                .await?;
            assert_eq!(unordered["doctors"], unknown["doctors"]);
            assert_eq!(
                column(&unordered, "doctors", "fullName"),
                vec!["Zed", "Amy", "Kim"]
            );

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn doctors_share_an_existing_room() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let first = app
                .create("/doctors", &DoctorBuilder::new("One").room(101).build())
                .await?;
            let second = app
                .create(
                    "/doctors",
                    &DoctorBuilder::new("Two")
                        .room(101)
                        .specialization("Surgeon")
                        .build(),
                )
                .await?;

            let a = app.get_json(&format!("/doctors/{first}")).await?;
            let b = app.get_json(&format!("/doctors/{second}")).await?;
            assert_eq!(a["roomId"], b["roomId"]);
            assert_ne!(a["specializationId"], b["specializationId"]);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn unknown_or_malformed_id_is_bare_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            for path in [format!("/doctors/{}", Uuid::new_v4()), "/doctors/not-a-uuid".to_string()] {
                let (status, _headers, body) = app.request(Method::GET, &path, None).await?;
                assert_status(status, StatusCode::NOT_FOUND, &path);
                assert!(body.is_empty(), "{path}: 404 has no body");
            }

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn district_flag_with_null_clears_district() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let id = app
                .create("/doctors", &DoctorBuilder::new("D").district(7).build())
                .await?;

            let status = patch(app, id, json!({"isDistrictUpdated": true, "district": null})).await?;
            assert_status(status, StatusCode::NO_CONTENT, "clear district");

            let details = app.get_json(&format!("/doctors/{id}")).await?;
            assert!(details["districtId"].is_null());

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn omitted_district_is_left_untouched() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let id = app
                .create("/doctors", &DoctorBuilder::new("D").district(7).build())
                .await?;
            let before = app.get_json(&format!("/doctors/{id}")).await?;

            let status = patch(app, id, json!({"fullName": "Renamed"})).await?;
            assert_status(status, StatusCode::NO_CONTENT, "rename");

            let after = app.get_json(&format!("/doctors/{id}")).await?;
            assert_eq!(after["districtId"], before["districtId"]);
            assert_eq!(after["roomId"], before["roomId"]);

            let page = app.get_json("/doctors?count=10&page=1").await?;
            assert_eq!(page["doctors"][0]["fullName"], "Renamed");

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn district_without_flag_is_ignored() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let id = app
                .create("/doctors", &DoctorBuilder::new("D").district(7).build())
                .await?;
            let before = app.get_json(&format!("/doctors/{id}")).await?;

            for body in [json!({"district": 8}), json!({"district": null})] {
                let status = patch(app, id, body.clone()).await?;
                assert_status(status, StatusCode::NO_CONTENT, &body.to_string());

                let after = app.get_json(&format!("/doctors/{id}")).await?;
                assert_eq!(after["districtId"], before["districtId"], "{body}");
            }

            let page = app.get_json("/doctors?count=10&page=1").await?;
            assert_eq!(page["doctors"][0]["district"], 7);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn district_flag_false_ignores_district() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let id = app
                .create("/doctors", &DoctorBuilder::new("D").district(7).build())
                .await?;
            let before = app.get_json(&format!("/doctors/{id}")).await?;

            let status = patch(app, id, json!({"isDistrictUpdated": false, "district": 8})).await?;
            assert_status(status, StatusCode::NO_CONTENT, "ignored district");

            let after = app.get_json(&format!("/doctors/{id}")).await?;
            assert_eq!(after["districtId"], before["districtId"]);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn edit_resolves_new_references() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let id = app.create("/doctors", &doctor("D")).await?;
            let other = app
                .create("/doctors", &DoctorBuilder::new("E").room(202).build())
                .await?;

            let status = patch(
                app,
                id,
                json!({
                    "room": 202,
                    "specialization": "Neurologist",
                    "isDistrictUpdated": true,
                    "district": 2,
                }),
            )
            .await?;
            assert_status(status, StatusCode::NO_CONTENT, "edit references");

            let edited = app.get_json(&format!("/doctors/{id}")).await?;
            let other = app.get_json(&format!("/doctors/{other}")).await?;
            assert_eq!(edited["roomId"], other["roomId"]);
            assert!(edited["districtId"].is_string());

            let page = app.get_json("/doctors?count=10&page=1").await?;
            assert_eq!(page["doctors"][0]["specialization"], "Neurologist");
            assert_eq!(page["doctors"][0]["district"], 2);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn null_for_required_field_keeps_value() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let id = app.create("/doctors", &doctor("Keep Me")).await?;

            let status = patch(app, id, json!({"fullName": null, "room": null})).await?;
            assert_status(status, StatusCode::NO_CONTENT, "null fields");

            let page = app.get_json("/doctors?count=10&page=1").await?;
            assert_eq!(page["doctors"][0]["fullName"], "Keep Me");
            assert_eq!(page["doctors"][0]["room"], 101);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn edit_and_delete_unknown_doctor_return_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let id = Uuid::new_v4();
            let status = patch(app, id, json!({"fullName": "Nobody"})).await?;
            assert_status(status, StatusCode::NOT_FOUND, "edit unknown");

            let (status, _headers, _body) = app
                .request(Method::DELETE, &format!("/doctors/{id}"), None)
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "delete unknown");

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn delete_removes_doctor_but_keeps_room() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let first = app.create("/doctors", &doctor("First")).await?;
            let room_id = app.get_json(&format!("/doctors/{first}")).await?["roomId"].clone();

            let (status, _headers, _body) = app
                .request(Method::DELETE, &format!("/doctors/{first}"), None)
                .await?;
            assert_status(status, StatusCode::NO_CONTENT, "delete");

            let (status, _headers, _body) = app
                .request(Method::GET, &format!("/doctors/{first}"), None)
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "read deleted");

            let second = app.create("/doctors", &doctor("Second")).await?;
            let details = app.get_json(&format!("/doctors/{second}")).await?;
            assert_eq!(details["roomId"], room_id);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn invalid_bodies_are_rejected() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let cases = [
                json!({"room": 1, "specialization": "X"}),
                json!({"fullName": "", "room": 1, "specialization": "X"}),
                json!({"fullName": "A", "room": 1, "specialization": ""}),
                json!({"fullName": "A", "room": "one", "specialization": "X"}),
                json!({"fullName": "A", "room": 1, "specialization": "x".repeat(101)}),
            ];

            for body in cases {
                let (status, _headers, response) = app
                    .request(Method::POST, "/doctors", Some(to_json_body(&body)?))
                    .await?;
                assert_status(status, StatusCode::BAD_REQUEST, &body.to_string());
                assert_error_body(&response, StatusCode::BAD_REQUEST)?;
            }

            let page = app.get_json("/doctors?count=10&page=1").await?;
            assert_eq!(page["totalCount"], 0);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn invalid_paging_parameters_are_rejected() -> anyhow::Result<()> {
    with_test_app_with_config(
        |config| config.pagination.max_page_size = Some(50),
        |app| {
            Box::pin(async move {
                for query in [
                    "/doctors?count=0&page=1",
                    "/doctors?count=10&page=0",
                    "/doctors?count=-1&page=1",
                    "/doctors?page=1",
                    "/doctors?count=10",
                    "/doctors?count=ten&page=1",
                    "/doctors?count=51&page=1",
                ] {
                    let (status, _headers, body) = app.request(Method::GET, query, None).await?;
                    assert_status(status, StatusCode::BAD_REQUEST, query);
                    assert_error_body(&body, StatusCode::BAD_REQUEST)?;
                }

                let (status, _headers, _body) = app
                    .request(Method::GET, "/doctors?count=50&page=1", None)
                    .await?;
                assert_status(status, StatusCode::OK, "max page size is allowed");

                Ok(())
            })
        },
    )
    .await
}

#[tokio::test]
async fn large_count_and_page_are_accepted_by_default() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            seed_doctors(app, 3).await?;

            let page = app.get_json("/doctors?count=5000&page=1").await?;
            assert_eq!(column(&page, "doctors", "id").len(), 3);
            assert_eq!(page_meta(&page), (3, 1, false, false));

            let page = app.get_json("/doctors?count=10&page=5000000000").await?;
            assert!(column(&page, "doctors", "id").is_empty());
            assert_eq!(page_meta(&page), (3, 1, true, true));

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn empty_collection_page_flags() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, body) = app
                .request(Method::GET, "/doctors?count=10&page=1", None)
                .await?;
            assert_status(status, StatusCode::OK, "list empty");

            let page = json_body(&body)?;
            assert_eq!(page_meta(&page), (0, 0, false, true));

            Ok(())
        })
    })
    .await
}
