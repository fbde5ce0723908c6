use std::sync::Arc;

use anyhow::Context;
use axum::{Extension, Json, Router, routing::get};
use serde_json::{Value, json};
use storage::Database;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod extract;
mod features;
mod middleware;
mod provider;

use config::Config;
use features::{custom_exercise_names, exercise_goals, exercises, templates, users, workouts};
use middleware::auth::{AuthState, TokenVerifier};
use provider::ProviderAdmin;

#[derive(OpenApi)]
#[openapi(
    paths(
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::update_user,
        users::handlers::delete_user,
        workouts::handlers::list_workouts,
        workouts::handlers::get_workout,
        workouts::handlers::create_workout,
        workouts::handlers::update_workout,
        workouts::handlers::delete_workout,
        templates::handlers::list_templates,
        templates::handlers::get_template,
        templates::handlers::create_template,
        templates::handlers::update_template,
        templates::handlers::delete_template,
        templates::handlers::duplicate_template,
        exercises::handlers::list_exercises,
        exercises::handlers::get_exercise,
        exercises::handlers::last_performance,
        exercises::handlers::exercise_directory,
        exercises::handlers::exercise_history,
        custom_exercise_names::handlers::list_custom_exercise_names,
        custom_exercise_names::handlers::get_custom_exercise_name,
        custom_exercise_names::handlers::create_custom_exercise_name,
        custom_exercise_names::handlers::update_custom_exercise_name,
        custom_exercise_names::handlers::delete_custom_exercise_name,
        exercise_goals::handlers::list_exercise_goals,
        exercise_goals::handlers::get_exercise_goal,
        exercise_goals::handlers::create_exercise_goal,
        exercise_goals::handlers::update_exercise_goal,
        exercise_goals::handlers::delete_exercise_goal,
    ),
    components(
        schemas(
            storage::dto::user::UserResponse,
            storage::dto::user::UpdateUserRequest,
            storage::dto::workout::CreateWorkoutRequest,
            storage::dto::workout::UpdateWorkoutRequest,
            storage::dto::workout::ExerciseInput,
            storage::dto::workout::SetInput,
            storage::dto::workout::WorkoutResponse,
            storage::dto::workout::ExerciseResponse,
            storage::dto::workout::SetResponse,
            storage::dto::workout::WorkoutListEntry,
            storage::dto::template::CreateTemplateRequest,
            storage::dto::template::UpdateTemplateRequest,
            storage::dto::template::ExerciseTemplateInput,
            storage::dto::template::SetTemplateInput,
            storage::dto::template::TemplateResponse,
            storage::dto::template::ExerciseTemplateResponse,
            storage::dto::template::SetTemplateResponse,
            storage::dto::exercise::ExerciseHistoryEntry,
            storage::dto::custom_exercise_name::CustomExerciseNameRequest,
            storage::dto::custom_exercise_name::CustomExerciseNameResponse,
            storage::dto::exercise_goal::CreateExerciseGoalRequest,
            storage::dto::exercise_goal::UpdateExerciseGoalRequest,
            storage::dto::exercise_goal::ExerciseGoalResponse,
            storage::dto::common::PaginationMeta,
        )
    ),
    tags(
        (name = "users", description = "Account of the authenticated user"),
        (name = "workouts", description = "Workouts instantiated from templates"),
        (name = "templates", description = "Reusable workout templates"),
        (name = "exercises", description = "Read-only exercise history"),
        (name = "custom-exercise-names", description = "User-defined exercise names"),
        (name = "exercise-goals", description = "Per-exercise goal weights"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn api_routes(auth: AuthState) -> Router<Database> {
    Router::new()
        .nest("/users", users::routes::routes(auth.clone()))
        .nest("/workouts", workouts::routes::routes(auth.clone()))
        .nest("/workout-templates", templates::routes::routes(auth.clone()))
        .nest("/exercises", exercises::routes::routes(auth.clone()))
        .nest(
            "/custom-exercise-names",
            custom_exercise_names::routes::routes(auth.clone()),
        )
        .nest("/exercise-goals", exercise_goals::routes::routes(auth))
}

fn app(db: Database, auth: AuthState, admin: ProviderAdmin) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes(auth))
        .with_state(db)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(Extension(admin))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting workout tracker API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let verifier =
        TokenVerifier::from_config(&config.auth).context("Failed to set up token verification")?;
    let auth = AuthState {
        db: db.clone(),
        verifier: Arc::new(verifier),
    };
    let admin = ProviderAdmin::from_config(&config.auth);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);

    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    axum::serve(listener, app(db, auth, admin))
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let db = Database::from_pool(pool);
        let auth = AuthState {
            db: db.clone(),
            verifier: Arc::new(TokenVerifier::from_secret(b"test-secret", "authenticated")),
        };

        app(db, auth, ProviderAdmin::disabled())
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_every_api_prefix_requires_a_token() {
        let paths = [
            "/api/users",
            "/api/workouts",
            "/api/workout-templates",
            "/api/exercises",
            "/api/exercises/directory",
            "/api/custom-exercise-names",
            "/api/exercise-goals",
        ];

        for path in paths {
            let response = test_app()
                .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
        }
    }

    #[tokio::test]
    async fn test_duplicate_requires_a_token() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/workout-templates/00000000-0000-0000-0000-000000000000/duplicate")
            .header("Authorization", "Token abc")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/workouts"));
        assert!(doc.paths.paths.contains_key("/api/workout-templates/{id}/duplicate"));
        assert!(doc.paths.paths.contains_key("/api/exercises/last-performance"));
    }
}
