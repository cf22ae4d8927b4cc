mod common;

use hikejo::database::Collection;
use reqwest::StatusCode;
use serde_json::json;

use common::{phone, spawn};

#[tokio::test]
async fn test_signup_hides_credentials_and_logs_in() {
    let app = spawn().await;
    let adventurer = app.adventurer().await;

    assert!(adventurer.profile.get("passwordHash").is_none());
    assert!(adventurer.profile.get("password").is_none());
    assert_eq!(adventurer.profile["role"], "adventurer");

    let (status, body) = app
        .post(
            "/auth/login/adventurer",
            None,
            json!({ "email": adventurer.email.to_uppercase(), "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged in successfully");
    assert_eq!(body["data"]["adventurer"]["_id"], adventurer.id.as_str());

    let (status, body) = app
        .post(
            "/auth/login/adventurer",
            None,
            json!({ "email": adventurer.email, "password": "wrong-one" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = app
        .post(
            "/auth/login/adventurer",
            None,
            json!({ "email": "nobody@example.com", "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Adventurer not found");
}

#[tokio::test]
async fn test_signup_validation_messages() {
    let app = spawn().await;

    let (status, body) = app
        .post(
            "/auth/signup/adventurer",
            None,
            json!({
                "firstName": "",
                "lastName": "Haddad",
                "gender": "male",
                "age": 30,
                "city": "Irbid",
                "email": "omar@example.com",
                "phoneNumber": "0791234567",
                "password": "abc"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("First name is required"));
    assert!(message.contains("Please provide a valid Jordanian phone number"));
    assert!(message.contains("Password must be at least 6 characters long"));
}

#[tokio::test]
async fn test_emails_are_unique_across_roles() {
    let app = spawn().await;
    let adventurer = app.adventurer().await;

    let (status, body) = app
        .post(
            "/auth/signup/company",
            None,
            json!({
                "companyName": "Dana Hikes",
                "companyId": "JO-DANA",
                "location": "Dana",
                "yearsInBusiness": 3,
                "email": adventurer.email,
                "phoneNumber": phone(9_000_001),
                "password": "longsecret"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Email, phone number, or Company ID already exists"
    );
}

#[tokio::test]
async fn test_company_logs_in_with_company_id() {
    let app = spawn().await;
    let company = app.company().await;
    let company_id = company.profile["companyId"].as_str().unwrap();

    let (status, body) = app
        .post(
            "/auth/login/company",
            None,
            json!({ "companyId": company_id, "password": "longsecret" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["company"]["_id"], company.id.as_str());

    let (status, body) = app
        .post(
            "/auth/login/company",
            None,
            json!({ "companyId": company_id, "password": "not-it-at-all" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Id or password");

    let (status, body) = app
        .post(
            "/auth/login/company",
            None,
            json!({ "companyId": "JO-NOPE", "password": "longsecret" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Company not found");
}

#[tokio::test]
async fn test_session_rejections() {
    let app = spawn().await;
    let adventurer = app.adventurer().await;

    let (status, body) = app.get("/adventurer/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "You are not logged in. Please log in to access this resource."
    );

    let (status, body) = app.get("/adventurer/profile", Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token. Please log in again.");

    let (status, body) = app
        .get("/company/profile", Some(&adventurer.token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "You do not have permission to perform this action."
    );

    app.state
        .database
        .remove(Collection::Adventurers, &adventurer.id)
        .await
        .unwrap();

    let (status, body) = app
        .get("/adventurer/profile", Some(&adventurer.token))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "The user belonging to this token no longer exists."
    );
}

#[tokio::test]
async fn test_password_reset_flow() {
    let mut app = spawn().await;
    let adventurer = app.adventurer().await;

    let (status, body) = app
        .post(
            "/auth/forgot-password",
            None,
            json!({ "email": "ghost@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No account with that email found");

    let (status, _) = app
        .post(
            "/auth/forgot-password",
            None,
            json!({ "email": adventurer.email }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let emails = app.emails();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].to, adventurer.email);
    assert_eq!(emails[0].subject, "HikeJo Password Reset Code");
    let code = emails[0].text.rsplit(' ').next().unwrap().to_string();

    let (status, body) = app
        .post(
            "/auth/verify-reset-code",
            None,
            json!({ "email": adventurer.email, "code": "000000" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid reset code or email");

    let (status, _) = app
        .post(
            "/auth/verify-reset-code",
            None,
            json!({ "email": adventurer.email, "code": code }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/auth/reset-password",
            None,
            json!({
                "email": adventurer.email,
                "code": code,
                "newPassword": "newsecret",
                "confirmPassword": "different"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Passwords do not match");

    let (status, body) = app
        .post(
            "/auth/reset-password",
            None,
            json!({
                "email": adventurer.email,
                "code": code,
                "newPassword": "abc",
                "confirmPassword": "abc"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password must be at least 6 characters long");

    let (status, _) = app
        .post(
            "/auth/reset-password",
            None,
            json!({
                "email": adventurer.email,
                "code": code,
                "newPassword": "newsecret",
                "confirmPassword": "newsecret"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            "/auth/login/adventurer",
            None,
            json!({ "email": adventurer.email, "password": "newsecret" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            "/auth/verify-reset-code",
            None,
            json!({ "email": adventurer.email, "code": code }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_company_reset_needs_eight_characters() {
    let mut app = spawn().await;
    let company = app.company().await;

    app.post(
        "/auth/forgot-password",
        None,
        json!({ "email": company.email }),
    )
    .await;
    let code = app.emails()[0].text.rsplit(' ').next().unwrap().to_string();

    let (status, body) = app
        .post(
            "/auth/reset-password",
            None,
            json!({
                "email": company.email,
                "code": code,
                "newPassword": "seven77",
                "confirmPassword": "seven77"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password must be at least 8 characters long");
}
