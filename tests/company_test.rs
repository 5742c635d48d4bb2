mod common;

use rapier_auth::auth::user::UserRole;
use rapier_auth::error::RapierError;
use rapier_auth::services::CompanyUpdate;

#[tokio::test]
async fn test_founder_is_member() {
    let (gate, _) = common::setup();
    let alice = common::create_user(&gate, "alice", UserRole::User).await;
    let membership = gate.membership();

    let company = membership
        .create_company("Acme", Some("Anvils".to_string()), &alice.id)
        .await
        .unwrap();

    assert_eq!(company.name, "Acme");
    assert_eq!(company.description.as_deref(), Some("Anvils"));
    assert_eq!(company.created_at, company.updated_at);
    assert!(membership.is_member(&company.id, &alice.id).await.unwrap());

    let companies = membership.get_companies_for_user(&alice.id).await.unwrap();
    assert_eq!(companies, vec![company.clone()]);

    let loaded = membership.get_company_with_members(&company.id).await.unwrap();
    assert_eq!(loaded.company, company);
    assert_eq!(loaded.users, vec![alice.clone()]);
    assert!(loaded.has_member(&alice.id));
}

#[tokio::test]
async fn test_create_with_unknown_founder() {
    let (gate, _) = common::setup();
    let membership = gate.membership();

    let err = membership
        .create_company("Ghost", None, "missing")
        .await
        .unwrap_err();
    assert_eq!(err, RapierError::NotFound("User".to_string()));
    assert!(membership.get_companies_for_user("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_empty_name() {
    let (gate, _) = common::setup();
    let alice = common::create_user(&gate, "alice", UserRole::User).await;

    let err = gate
        .membership()
        .create_company("   ", None, &alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, RapierError::ValidationError(_)));
}

#[tokio::test]
async fn test_add_and_remove_member() {
    let (gate, _) = common::setup();
    let alice = common::create_user(&gate, "alice", UserRole::User).await;
    let bob = common::create_user(&gate, "bob", UserRole::User).await;
    let membership = gate.membership();
    let company = membership.create_company("Acme", None, &alice.id).await.unwrap();

    let with_bob = membership.add_member(&company.id, &bob.id).await.unwrap();
    assert!(with_bob.has_member(&alice.id));
    assert!(with_bob.has_member(&bob.id));

    let err = membership.add_member(&company.id, &bob.id).await.unwrap_err();
    assert!(matches!(err, RapierError::Conflict(_)));
    let unchanged = membership.get_company_with_members(&company.id).await.unwrap();
    assert_eq!(unchanged.users.len(), 2);

    let without_bob = membership.remove_member(&company.id, &bob.id).await.unwrap();
    assert!(!without_bob.has_member(&bob.id));
    assert!(!membership.is_member(&company.id, &bob.id).await.unwrap());

    let err = membership.remove_member(&company.id, &bob.id).await.unwrap_err();
    assert!(matches!(err, RapierError::Conflict(_)));
    let unchanged = membership.get_company_with_members(&company.id).await.unwrap();
    assert_eq!(unchanged.users, vec![alice]);
}

#[tokio::test]
async fn test_last_member_stays() {
    let (gate, _) = common::setup();
    let alice = common::create_user(&gate, "alice", UserRole::User).await;
    let membership = gate.membership();
    let company = membership.create_company("Acme", None, &alice.id).await.unwrap();

    let err = membership.remove_member(&company.id, &alice.id).await.unwrap_err();
    assert!(matches!(err, RapierError::Conflict(_)));
    assert!(membership.is_member(&company.id, &alice.id).await.unwrap());
}

#[tokio::test]
async fn test_membership_not_found() {
    let (gate, _) = common::setup();
    let alice = common::create_user(&gate, "alice", UserRole::User).await;
    let membership = gate.membership();
    let company = membership.create_company("Acme", None, &alice.id).await.unwrap();

    let err = membership.add_member("missing", &alice.id).await.unwrap_err();
    assert_eq!(err, RapierError::NotFound("Company".to_string()));

    let err = membership.add_member(&company.id, "missing").await.unwrap_err();
    assert_eq!(err, RapierError::NotFound("User".to_string()));

    let err = membership.remove_member("missing", &alice.id).await.unwrap_err();
    assert_eq!(err, RapierError::NotFound("Company".to_string()));

    let err = membership.remove_member(&company.id, "missing").await.unwrap_err();
    assert_eq!(err, RapierError::NotFound("User".to_string()));
    assert!(membership.is_member(&company.id, &alice.id).await.unwrap());

    assert!(!membership.is_member("missing", &alice.id).await.unwrap());
    assert!(membership.get_company_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_company() {
    let (gate, _) = common::setup();
    let alice = common::create_user(&gate, "alice", UserRole::User).await;
    let membership = gate.membership();
    let company = membership
        .create_company("Acme", Some("Anvils".to_string()), &alice.id)
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let update = CompanyUpdate {
        name: Some("Acme Corp".to_string()),
        description: None,
    };
    let updated = membership.update_company(&company.id, update).await.unwrap();
    assert_eq!(updated.name, "Acme Corp");
    assert_eq!(updated.description.as_deref(), Some("Anvils"));
    assert_eq!(updated.created_at, company.created_at);
    assert!(updated.updated_at > company.updated_at);

    let stored = membership.get_company_by_id(&company.id).await.unwrap().unwrap();
    assert_eq!(stored, updated);

    let err = membership
        .update_company("missing", CompanyUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err, RapierError::NotFound("Company".to_string()));
}

#[tokio::test]
async fn test_clear_description() {
    let (gate, _) = common::setup();
    let alice = common::create_user(&gate, "alice", UserRole::User).await;
    let membership = gate.membership();
    let company = membership
        .create_company("Acme", Some("Anvils".to_string()), &alice.id)
        .await
        .unwrap();

    let update: CompanyUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
    let updated = membership.update_company(&company.id, update).await.unwrap();
    assert_eq!(updated.name, "Acme");
    assert!(updated.description.is_none());
}

#[tokio::test]
async fn test_companies_for_unknown_user() {
    let (gate, _) = common::setup();
    let companies = gate
        .membership()
        .get_companies_for_user("nobody")
        .await
        .unwrap();
    assert!(companies.is_empty());
}

#[tokio::test]
async fn test_deleted_user_leaves_companies() {
    let (gate, _) = common::setup();
    let alice = common::create_user(&gate, "alice", UserRole::User).await;
    let bob = common::create_user(&gate, "bob", UserRole::User).await;
    let membership = gate.membership();
    let company = membership.create_company("Acme", None, &alice.id).await.unwrap();
    membership.add_member(&company.id, &bob.id).await.unwrap();

    gate.identity().delete_user(&alice.id).await.unwrap();

    let loaded = membership.get_company_with_members(&company.id).await.unwrap();
    assert_eq!(loaded.users, vec![bob]);
    assert!(membership.get_companies_for_user(&alice.id).await.unwrap().is_empty());
}
