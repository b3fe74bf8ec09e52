use std::io::{self, IsTerminal};

use anyhow::anyhow;
use lapor_api_models::RegisterRequest;
use lapor_client::ClientError;
use lapor_client::validation::{validate_login, validate_register};

use crate::cli::{LoginArgs, OutputFormat, RegisterArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_session;

pub(crate) async fn handle_login(ctx: &AppContext, args: LoginArgs) -> CliResult<()> {
    let password = resolve_secret(args.password, "Password: ")?;
    validate_login(&args.email, &password).map_err(ClientError::Validation)?;

    let session = ctx.auth.login(&args.email, &password).await?;
    match session.display_name() {
        Some(name) => println!("Login berhasil sebagai {name}."),
        None => println!("Login berhasil."),
    }
    Ok(())
}

pub(crate) async fn handle_register(ctx: &AppContext, args: RegisterArgs) -> CliResult<()> {
    let password = resolve_secret(args.password, "Password: ")?;
    let password_confirmation = match args.password_confirmation {
        Some(value) => value,
        None if io::stdin().is_terminal() => prompt("Konfirmasi password: ")?,
        None => password.clone(),
    };
    let request = RegisterRequest {
        name: args.name.trim().to_string(),
        email: args.email.trim().to_string(),
        password,
        password_confirmation,
    };
    validate_register(&request).map_err(ClientError::Validation)?;

    let message = ctx.auth.register(&request).await?;
    println!(
        "{}",
        message.as_deref().unwrap_or("Registrasi berhasil. Silakan login.")
    );
    Ok(())
}

pub(crate) async fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    ctx.auth.logout().await?;
    println!("Logout berhasil.");
    Ok(())
}

pub(crate) fn handle_whoami(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    render_session(&ctx.session.session(), format)
}

/// Flag or environment value, else an interactive prompt when attached to a
/// terminal.
pub(crate) fn resolve_secret(value: Option<String>, label: &str) -> CliResult<String> {
    if let Some(value) = value {
        if value.is_empty() {
            return Err(CliError::validation("password cannot be empty"));
        }
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        prompt(label)
    } else {
        Err(CliError::validation(
            "password required; supply via --password or LAPOR_PASSWORD when running non-interactively",
        ))
    }
}

fn prompt(label: &str) -> CliResult<String> {
    rpassword::prompt_password(label)
        .map_err(|err| CliError::failure(anyhow!("failed to read password from stdin: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{context_with, signed_in};
    use httpmock::prelude::*;
    use lapor_api_models::Role;
    use lapor_client::Session;
    use serde_json::json;

    #[tokio::test]
    async fn login_stores_token_role_and_name() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/login")
                .json_body(json!({ "email": "admin@desa.id", "password": "rahasia" }));
            then.status(200).json_body(json!({
                "token": "tok-abc",
                "user": { "name": "Admin Desa", "email": "admin@desa.id", "role": "admin" }
            }));
        });

        let ctx = context_with(&server, Session::default());
        handle_login(
            &ctx,
            LoginArgs {
                email: " admin@desa.id ".into(),
                password: Some("rahasia".into()),
            },
        )
        .await
        .expect("login succeeds");

        mock.assert();
        let session = ctx.session.session();
        assert_eq!(session.token.as_deref(), Some("tok-abc"));
        assert_eq!(session.role, Some(Role::Admin));
        assert_eq!(session.initials(), "AD");
    }

    #[tokio::test]
    async fn login_without_token_is_a_validation_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/login");
            then.status(401).json_body(json!({ "message": "Unauthorized" }));
        });

        let ctx = context_with(&server, Session::default());
        let err = handle_login(
            &ctx,
            LoginArgs {
                email: "warga@desa.id".into(),
                password: Some("salah".into()),
            },
        )
        .await
        .expect_err("login rejected");

        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("Unauthorized"));
        assert!(!ctx.session.session().is_authenticated());
    }

    #[tokio::test]
    async fn blank_email_fails_before_any_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.path("/api/login");
            then.status(200);
        });

        let ctx = context_with(&server, Session::default());
        let err = handle_login(
            &ctx,
            LoginArgs {
                email: "  ".into(),
                password: Some("rahasia".into()),
            },
        )
        .await
        .expect_err("validation fails");

        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("Email wajib diisi."));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn register_checks_confirmation_locally() {
        let server = MockServer::start_async().await;
        let ctx = context_with(&server, Session::default());
        let err = handle_register(
            &ctx,
            RegisterArgs {
                name: "Sari".into(),
                email: "sari@desa.id".into(),
                password: Some("rahasia1".into()),
                password_confirmation: Some("rahasia2".into()),
            },
        )
        .await
        .expect_err("mismatch rejected");
        assert!(
            err.display_message()
                .contains("password_confirmation: Konfirmasi password tidak cocok.")
        );
    }

    #[tokio::test]
    async fn register_surfaces_server_field_errors() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/register").json_body(json!({
                "name": "Sari",
                "email": "sari@desa.id",
                "password": "rahasia1",
                "password_confirmation": "rahasia1"
            }));
            then.status(422).json_body(json!({
                "message": "The given data was invalid.",
                "errors": { "email": ["Email sudah terdaftar."] }
            }));
        });

        let ctx = context_with(&server, Session::default());
        let err = handle_register(
            &ctx,
            RegisterArgs {
                name: "Sari".into(),
                email: "sari@desa.id".into(),
                password: Some("rahasia1".into()),
                password_confirmation: None,
            },
        )
        .await
        .expect_err("server rejects");

        mock.assert();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "email: Email sudah terdaftar.");
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_server_fails() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/logout")
                .header("authorization", "Bearer tok-123");
            then.status(500).json_body(json!({ "message": "boom" }));
        });

        let ctx = context_with(&server, signed_in(Some(Role::User)));
        handle_logout(&ctx).await.expect("logout always clears");

        mock.assert();
        assert_eq!(ctx.session.session(), Session::default());
    }

    #[test]
    fn explicit_empty_password_is_rejected() {
        let err = resolve_secret(Some(String::new()), "Password: ").expect_err("empty");
        assert_eq!(err.exit_code(), 2);
    }
}
