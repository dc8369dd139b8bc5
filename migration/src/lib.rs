// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// 漏洩レコード関連マイグレーション
mod m20250801_000001_create_data_breaches_table;
mod m20250801_000002_add_data_breach_indexes;

// 認証関連マイグレーション
mod m20250801_000003_create_users_table;
mod m20250801_000004_create_admin_users_table;
mod m20250801_000005_create_sessions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20250801_000001_create_data_breaches_table::Migration),
            Box::new(m20250801_000003_create_users_table::Migration),
            // 2. 基本テーブルのインデックス追加
            Box::new(m20250801_000002_add_data_breach_indexes::Migration),
            // 3. usersテーブルに依存するテーブル
            Box::new(m20250801_000004_create_admin_users_table::Migration),
            Box::new(m20250801_000005_create_sessions_table::Migration),
        ]
    }
}
