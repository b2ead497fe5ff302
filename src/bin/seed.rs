use chrono::Utc;
use mc_store_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        products::{ActiveModel as ProductActive, Column as ProductCol, Entity as Products},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    services::auth_service::hash_password,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    seed_categories(&orm).await?;
    seed_products(&orm).await?;
    let user_id = ensure_player(&orm, "steve@example.com", "Steve", "steve123", 5_000).await?;

    println!("Seed completed. Demo player ID: {user_id}");
    Ok(())
}

async fn seed_categories(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let categories = [("Keys", "keys", 1), ("Crates", "crates", 2), ("Ranks", "ranks", 3)];

    for (name, slug, display_order) in categories {
        let exists = Categories::find()
            .filter(CategoryCol::Slug.eq(slug))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }
        CategoryActive {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            display_order: Set(display_order),
            active: Set(true),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded categories");
    Ok(())
}

async fn seed_products(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let products = [
        ("Vote Key", "keys", "A key for the vote crate", 199, "crate key give {player} vote {quantity}"),
        ("Legendary Key", "keys", "A key for the legendary crate", 499, "crate key give {player} legendary {quantity}"),
        ("Spawner Crate", "crates", "One random mob spawner", 999, "crate give {player} spawner {quantity}"),
        ("VIP Rank", "ranks", "Lifetime VIP rank", 1499, "lp user {player} parent add vip"),
        ("MVP Rank", "ranks", "Lifetime MVP rank", 2999, "lp user {player} parent add mvp"),
    ];

    for (name, category, description, price, command) in products {
        let exists = Products::find()
            .filter(ProductCol::Name.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }
        ProductActive {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            category: Set(category.to_string()),
            price: Set(price),
            original_price: Set(None),
            on_sale: Set(false),
            image_url: Set(None),
            command_template: Set(Some(command.to_string())),
            active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn ensure_player(
    orm: &DatabaseConnection,
    email: &str,
    username: &str,
    password: &str,
    balance: i64,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("Player {username} already exists");
        return Ok(existing.id);
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        player_type: Set("java".to_string()),
        balance: Set(balance),
        total_spent: Set(0),
        created_at: Set(Utc::now()),
    }
    .insert(orm)
    .await?;

    println!("Ensured player {username} ({email})");
    Ok(user.id)
}
