//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the item vault here: registered users and
//! the items they own.

pub mod item;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::item::Entity as Item;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        // Setup database
        let db = setup_db().await?;

        // Create users
        let user1 = user::ActiveModel {
            username: Set("user1".to_string()),
            password_hash: Set("$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$aGFzaA".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let user2 = user::ActiveModel {
            username: Set("user2".to_string()),
            password_hash: Set("$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$aGFzaA".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create items for both users
        let item1 = item::ActiveModel {
            name: Set("Notebook".to_string()),
            description: Set(Some("Field notes".to_string())),
            owner_id: Set(user1.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let item2 = item::ActiveModel {
            name: Set("Camera".to_string()),
            description: Set(None),
            owner_id: Set(user1.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let item3 = item::ActiveModel {
            name: Set("Bicycle".to_string()),
            description: Set(Some("Commuter bike".to_string())),
            owner_id: Set(user2.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data

        // Verify users
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.username == "user1"));
        assert!(users.iter().any(|u| u.username == "user2"));

        // Verify items
        let items = Item::find().all(&db).await?;
        assert_eq!(items.len(), 3);
        assert!(items.iter().any(|i| i.name == "Notebook"));
        assert!(items.iter().any(|i| i.name == "Camera"));
        assert!(items.iter().any(|i| i.name == "Bicycle"));

        // Items filtered by owner come back ordered by id
        let user1_items = Item::find()
            .filter(item::Column::OwnerId.eq(user1.id))
            .order_by_asc(item::Column::Id)
            .all(&db)
            .await?;

        assert_eq!(user1_items.len(), 2);
        assert_eq!(user1_items[0].id, item1.id);
        assert_eq!(user1_items[1].id, item2.id);

        let user2_items = Item::find()
            .filter(item::Column::OwnerId.eq(user2.id))
            .all(&db)
            .await?;

        assert_eq!(user2_items.len(), 1);
        assert_eq!(user2_items[0].id, item3.id);

        // The items table stores the owner id verbatim
        assert_eq!(item1.owner_id, user1.id);
        assert_eq!(item3.owner_id, user2.id);

        // A second user with the same username is rejected by the unique index
        let duplicate = user::ActiveModel {
            username: Set("user1".to_string()),
            password_hash: Set("$argon2id$v=19$m=65536,t=3,p=4$c2FsdA$b3RoZXI".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(duplicate.is_err());
        assert_eq!(User::find().all(&db).await?.len(), 2);

        // Deleting a user cascades to their items
        user2.delete(&db).await?;
        let remaining = Item::find().all(&db).await?;
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|i| i.owner_id == user1.id));

        Ok(())
    }
}
