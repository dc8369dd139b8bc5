// src/bin/create_admin.rs
//
// 管理者ユーザーを作成し許可リストに登録する
//
//   create-admin <email> [password]
//
// パスワードを省略した場合はランダムに生成して表示する。

use rand::{distributions::Alphanumeric, Rng};
use std::env;

use breach_backend::config::Config;
use breach_backend::db::{create_db_pool, run_migrations};
use breach_backend::repository::{AuthRepository, PgAuthRepository};
use breach_backend::utils::password::PasswordManager;

const GENERATED_PASSWORD_LENGTH: usize = 20;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "breach_backend=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(email) = args.first().map(|e| e.trim().to_lowercase()) else {
        eprintln!("Usage: create-admin <email> [password]");
        std::process::exit(1);
    };
    if email.is_empty() {
        eprintln!("Error: Email cannot be empty");
        std::process::exit(1);
    }

    let (password, generated) = match args.get(1) {
        Some(password) => (password.clone(), false),
        None => (generate_password(), true),
    };

    let config = Config::from_env()?;
    let db = create_db_pool(&config).await?;
    run_migrations(&db).await?;

    let repo = PgAuthRepository::new(db);

    // 既存ユーザーのパスワードは変更しない
    let (user, created) = match repo.find_user_by_email(&email).await? {
        Some(existing) => (existing, false),
        None => {
            let password_hash = PasswordManager::from_env()?.hash_password(&password)?;
            (repo.create_user(&email, &password_hash).await?, true)
        }
    };
    repo.grant_admin(user.id).await?;

    println!("\n=== Admin User Ready ===");
    println!("User ID: {}", user.id);
    println!("Email: {}", user.email);
    if !created {
        println!("Existing user granted admin access; password unchanged");
    } else if generated {
        println!("Generated password: {}", password);
    }

    Ok(())
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}
