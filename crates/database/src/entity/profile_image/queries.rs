use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::storage::{BlobStore, image_key};
use crate::{Database, DatabaseError, DatabaseResult};

use super::{
    ALLOWED_EXTENSIONS, ActiveModel, Column, MAX_ADDITIONAL_IMAGES, MAX_IMAGE_BYTES, Model,
    NewImage, ProfileImage,
};

fn check_upload(image: &NewImage) -> DatabaseResult<()> {
    if image.file_name.trim().is_empty() || image.bytes.is_empty() {
        return Err(DatabaseError::validation("no file selected"));
    }

    let extension = image
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    if !extension.is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str())) {
        return Err(DatabaseError::validation("only jpg, jpeg and png images are allowed"));
    }

    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(DatabaseError::validation("image larger than 2 MiB"));
    }

    Ok(())
}

async fn count_images<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    primary: bool,
) -> DatabaseResult<u64> {
    ProfileImage::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsPrimary.eq(primary))
        .count(conn)
        .await
        .map_err(Into::into)
}

/// Best effort removal of a stored object. A leaked blob is preferable to a row
/// pointing at nothing, so failures are only logged.
async fn discard_blob(store: &dyn BlobStore, url: &str) -> bool {
    let Some(key) = store.key_for_url(url) else {
        tracing::warn!(url = %url, "image url is not inside the configured bucket");
        return false;
    };

    match store.delete(&key).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "failed to delete image blob");
            false
        }
    }
}

impl Database {
    pub async fn list_images(&self, user_id: Uuid) -> DatabaseResult<Vec<Model>> {
        ProfileImage::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::IsPrimary)
            .order_by_asc(Column::UploadedAt)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    async fn owned_image(&self, user_id: Uuid, image_id: Uuid) -> DatabaseResult<Model> {
        let image = ProfileImage::find_by_id(image_id)
            .one(&self.conn)
            .await?
            .ok_or(DatabaseError::NotFound)?;
        if image.user_id != user_id {
            return Err(DatabaseError::Forbidden);
        }
        Ok(image)
    }

    /// Validates and stores a new image. A member without a primary image always gets
    /// the upload as primary; a new primary replaces the old one, whose row is removed
    /// in the same transaction as the insert.
    pub async fn upload_image(
        &self,
        user_id: Uuid,
        image: NewImage,
        store: &dyn BlobStore,
    ) -> DatabaseResult<Model> {
        check_upload(&image)?;
        Self::require_user(&self.conn, user_id).await?;

        let is_primary = image.is_primary || count_images(&self.conn, user_id, true).await? == 0;
        if !is_primary && count_images(&self.conn, user_id, false).await? >= MAX_ADDITIONAL_IMAGES
        {
            return Err(DatabaseError::capacity(format!(
                "at most {MAX_ADDITIONAL_IMAGES} additional images"
            )));
        }

        let key = image_key(&image.file_name);
        let url = store
            .put(&key, image.bytes, &image.content_type)
            .await
            .map_err(|e| DatabaseError::Dependency(e.to_string()))?;

        let (saved, replaced) = match self.record_image(user_id, url.clone(), is_primary).await {
            Ok(rows) => rows,
            Err(e) => {
                discard_blob(store, &url).await;
                return Err(e);
            }
        };

        if let Some(old) = replaced {
            discard_blob(store, &old.image_url).await;
        }

        tracing::debug!(user_id = %user_id, image_id = %saved.id, is_primary, "stored profile image");
        Ok(saved)
    }

    async fn record_image(
        &self,
        user_id: Uuid,
        image_url: String,
        is_primary: bool,
    ) -> DatabaseResult<(Model, Option<Model>)> {
        let txn = self.conn.begin().await?;

        let replaced = if is_primary {
            let old = ProfileImage::find()
                .filter(Column::UserId.eq(user_id))
                .filter(Column::IsPrimary.eq(true))
                .one(&txn)
                .await?;
            if let Some(ref old) = old {
                ProfileImage::delete_by_id(old.id).exec(&txn).await?;
            }
            old
        } else {
            None
        };

        let saved = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            image_url: Set(image_url),
            is_primary: Set(is_primary),
            uploaded_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok((saved, replaced))
    }

    /// Makes an already uploaded image the primary one, demoting every other image.
    pub async fn set_primary_image(&self, user_id: Uuid, image_id: Uuid) -> DatabaseResult<Model> {
        self.owned_image(user_id, image_id).await?;

        let txn = self.conn.begin().await?;
        ProfileImage::update_many()
            .col_expr(Column::IsPrimary, Expr::value(false))
            .filter(Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        let promoted = ActiveModel {
            id: sea_orm::Unchanged(image_id),
            is_primary: Set(true),
            ..Default::default()
        }
        .update(&txn)
        .await?;
        txn.commit().await?;

        Ok(promoted)
    }

    /// Deletes the image row, then its blob. Returns whether the blob went too.
    pub async fn delete_image(
        &self,
        user_id: Uuid,
        image_id: Uuid,
        store: &dyn BlobStore,
    ) -> DatabaseResult<bool> {
        let image = self.owned_image(user_id, image_id).await?;

        ProfileImage::delete_by_id(image.id).exec(&self.conn).await?;

        Ok(discard_blob(store, &image.image_url).await)
    }
}
