use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{Database, DatabaseResult, user};

use super::{ActiveModel, Column, Model, ProfileView, VIEWS_KEPT_PER_PAIR, Visitor};

impl Database {
    pub async fn record_view(&self, viewer_id: Uuid, viewed_id: Uuid) -> DatabaseResult<()> {
        self.record_view_at(viewer_id, viewed_id, Utc::now()).await
    }

    /// Keeps a sliding window of the viewer's latest visits to one profile: below the
    /// cap a row is added, at the cap the oldest row is moved to `at`.
    pub async fn record_view_at(
        &self,
        viewer_id: Uuid,
        viewed_id: Uuid,
        at: DateTime<Utc>,
    ) -> DatabaseResult<()> {
        if viewer_id == viewed_id {
            return Ok(());
        }

        let txn = self.conn.begin().await?;
        let views = ProfileView::find()
            .filter(Column::ViewerId.eq(viewer_id))
            .filter(Column::ViewedId.eq(viewed_id))
            .order_by_asc(Column::Timestamp)
            .all(&txn)
            .await?;

        let full = views.len() >= VIEWS_KEPT_PER_PAIR;
        match views.into_iter().next() {
            Some(oldest) if full => {
                let mut oldest = oldest.into_active_model();
                oldest.timestamp = Set(at);
                oldest.update(&txn).await?;
            }
            _ => {
                ActiveModel {
                    id: Set(Uuid::new_v4()),
                    viewer_id: Set(viewer_id),
                    viewed_id: Set(viewed_id),
                    timestamp: Set(at),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn views_between(&self, viewer_id: Uuid, viewed_id: Uuid) -> DatabaseResult<Vec<Model>> {
        ProfileView::find()
            .filter(Column::ViewerId.eq(viewer_id))
            .filter(Column::ViewedId.eq(viewed_id))
            .order_by_asc(Column::Timestamp)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Distinct visitors of `viewed_id`, latest visit first.
    pub async fn recent_visitors(&self, viewed_id: Uuid, limit: usize) -> DatabaseResult<Vec<Visitor>> {
        let views = ProfileView::find()
            .filter(Column::ViewedId.eq(viewed_id))
            .order_by_desc(Column::Timestamp)
            .all(&self.conn)
            .await?;

        let mut seen = HashSet::new();
        let latest: Vec<Model> = views
            .into_iter()
            .filter(|view| seen.insert(view.viewer_id))
            .take(limit)
            .collect();

        let mut viewers: HashMap<Uuid, user::Model> = user::User::find()
            .filter(user::Column::Id.is_in(latest.iter().map(|v| v.viewer_id)))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(latest
            .into_iter()
            .filter_map(|view| {
                viewers.remove(&view.viewer_id).map(|user| Visitor {
                    user,
                    last_viewed_at: view.timestamp,
                })
            })
            .collect())
    }
}
