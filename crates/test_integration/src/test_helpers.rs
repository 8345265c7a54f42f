use crate::runner::context::test_context::TestContext;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_services::api::auth::interfaces::{CreateUser, LoginUser, Tokens};
use common_services::api::upload::interfaces::UploadView;
use common_types::dev_constants::{EMAIL, PASSWORD};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};

pub async fn login_as(context: &TestContext, email: &str, password: &str) -> Result<String> {
    let response = context
        .http_client
        .post(context.url("/auth/login"))
        .json(&LoginUser {
            email: email.to_owned(),
            password: password.to_owned(),
        })
        .send()
        .await?;
    if response.status() != StatusCode::OK {
        return Err(eyre!("Login as {email} failed with {}", response.status()));
    }
    let tokens: Tokens = response.json().await?;
    Ok(tokens.access_token)
}

/// Access token of the admin user created by the auth tests.
pub async fn login(context: &TestContext) -> Result<String> {
    login_as(context, EMAIL, PASSWORD).await
}

/// Registers a user (ignoring "already exists") and returns an access token for it.
pub async fn register_and_login(
    context: &TestContext,
    name: &str,
    email: &str,
    password: &str,
) -> Result<String> {
    context
        .http_client
        .post(context.url("/auth/register"))
        .json(&CreateUser {
            email: email.to_owned(),
            name: name.to_owned(),
            password: password.to_owned(),
        })
        .send()
        .await?;
    login_as(context, email, password).await
}

/// A form with one `file` part.
pub fn photo_form(bytes: &[u8], file_name: &str, content_type: &str) -> Result<Form> {
    let part = Part::bytes(bytes.to_vec())
        .file_name(file_name.to_owned())
        .mime_str(content_type)?;
    Ok(Form::new().part("file", part))
}

pub async fn post_upload(context: &TestContext, token: &str, form: Form) -> Result<Response> {
    Ok(context
        .http_client
        .post(context.url("/FileUpload"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await?)
}

/// Uploads `bytes` as a jpeg and decodes the returned view.
pub async fn upload_photo(context: &TestContext, token: &str, bytes: &[u8]) -> Result<UploadView> {
    let response = post_upload(context, token, photo_form(bytes, "photo.jpg", "image/jpeg")?).await?;
    if response.status() != StatusCode::OK {
        return Err(eyre!(
            "Upload failed with {}: {}",
            response.status(),
            response.text().await?
        ));
    }
    Ok(response.json().await?)
}
