use std::collections::{BTreeMap, HashMap};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::address::{self, AddressInput, AddressTag};
use crate::entity::non_blank;
use crate::{Database, DatabaseError, DatabaseResult, user};

use super::member::{self, FamilyMember, MemberInput};
use super::relation::{self, FamilyRelation};
use super::relation_category::{self, RelationCategory};
use super::relation_type::{self, RelationType};
use super::{FamilyTree, Sibling};

impl member::ActiveModel {
    fn apply(&mut self, input: MemberInput) {
        self.first_name = Set(input.first_name.trim().to_string());
        self.last_name = Set(input.last_name.trim().to_string());
        self.occupation = Set(non_blank(input.occupation));
        self.contact_number = Set(non_blank(input.contact_number));
        self.age = Set(input.age);
        self.email = Set(non_blank(input.email));
        self.marital_status = Set(non_blank(input.marital_status));
    }
}

fn check_member_input(input: &MemberInput) -> DatabaseResult<()> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(DatabaseError::validation("first and last name are required"));
    }
    if matches!(input.age, Some(age) if age < 0) {
        return Err(DatabaseError::validation("age cannot be negative"));
    }
    Ok(())
}

async fn require_relation_type<C: ConnectionTrait>(conn: &C, name: &str) -> DatabaseResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DatabaseError::validation("relation type is required"));
    }

    RelationType::find()
        .filter(relation_type::Column::Name.eq(name))
        .one(conn)
        .await?
        .map(|t| t.name)
        .ok_or_else(|| DatabaseError::validation(format!("unknown relation type {name:?}")))
}

async fn anchor_of<C: ConnectionTrait>(conn: &C, owner_id: Uuid) -> DatabaseResult<Option<member::Model>> {
    FamilyMember::find()
        .filter(member::Column::UserId.eq(owner_id))
        .filter(member::Column::IsSelf.eq(true))
        .one(conn)
        .await
        .map_err(Into::into)
}

/// The owner's own node, created from the account name on first use.
async fn ensure_anchor<C: ConnectionTrait>(conn: &C, owner: &user::Model) -> DatabaseResult<member::Model> {
    if let Some(anchor) = anchor_of(conn, owner.id).await? {
        return Ok(anchor);
    }

    member::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner.id),
        first_name: Set(owner.first_name.clone()),
        last_name: Set(owner.last_name.clone()),
        email: Set(Some(owner.email.clone())),
        contact_number: Set(owner.phone.clone()),
        is_self: Set(true),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(Into::into)
}

async fn owned_member<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
    member_id: Uuid,
) -> DatabaseResult<member::Model> {
    let member = FamilyMember::find_by_id(member_id)
        .one(conn)
        .await?
        .ok_or(DatabaseError::NotFound)?;
    if member.user_id != owner_id {
        return Err(DatabaseError::Forbidden);
    }
    Ok(member)
}

/// Inserts an edge, refusing a second edge of the same type between the same pair.
async fn link<C: ConnectionTrait>(
    conn: &C,
    person_id: Uuid,
    related_person_id: Uuid,
    relation_type: String,
) -> DatabaseResult<relation::Model> {
    let duplicates = FamilyRelation::find()
        .filter(relation::Column::PersonId.eq(person_id))
        .filter(relation::Column::RelatedPersonId.eq(related_person_id))
        .filter(relation::Column::RelationType.eq(relation_type.as_str()))
        .count(conn)
        .await?;
    if duplicates > 0 {
        return Err(DatabaseError::validation(format!(
            "{relation_type} relation already exists"
        )));
    }

    relation::ActiveModel {
        id: Set(Uuid::new_v4()),
        person_id: Set(person_id),
        related_person_id: Set(related_person_id),
        relation_type: Set(relation_type),
    }
    .insert(conn)
    .await
    .map_err(Into::into)
}

async fn set_sibling_flag<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
    sibling: Sibling,
    value: bool,
) -> DatabaseResult<()> {
    let mut row = Database::upsert_profile_row(conn, owner_id).await?;
    match sibling {
        Sibling::Brother => row.active().no_brother = Set(value),
        Sibling::Sister => row.active().no_sister = Set(value),
    }
    row.persist(conn).await?;
    Ok(())
}

impl Database {
    /// The relation taxonomy, categories and their types both sorted by name.
    pub async fn list_relation_types(
        &self,
    ) -> DatabaseResult<Vec<(relation_category::Model, Vec<relation_type::Model>)>> {
        RelationCategory::find()
            .order_by_asc(relation_category::Column::Name)
            .find_with_related(relation_type::Entity)
            .all(&self.conn)
            .await
            .map(|categories| {
                categories
                    .into_iter()
                    .map(|(category, mut types)| {
                        types.sort_by(|a, b| a.name.cmp(&b.name));
                        (category, types)
                    })
                    .collect()
            })
            .map_err(Into::into)
    }

    /// Every family member of the owner except the owner's own node.
    pub async fn list_family_members(&self, owner_id: Uuid) -> DatabaseResult<Vec<member::Model>> {
        FamilyMember::find()
            .filter(member::Column::UserId.eq(owner_id))
            .filter(member::Column::IsSelf.eq(false))
            .order_by_asc(member::Column::FirstName)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn family_anchor(&self, owner_id: Uuid) -> DatabaseResult<Option<member::Model>> {
        anchor_of(&self.conn, owner_id).await
    }

    /// Edges touching `member_id` from either end.
    pub async fn relations_touching(&self, member_id: Uuid) -> DatabaseResult<Vec<relation::Model>> {
        FamilyRelation::find()
            .filter(
                relation::Column::PersonId
                    .eq(member_id)
                    .or(relation::Column::RelatedPersonId.eq(member_id)),
            )
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// One slot per relation type of the taxonomy, filled with the member linked from
    /// the owner's node. Brother/Sister are left out entirely when the owner has
    /// declared having none.
    pub async fn list_relations(&self, owner_id: Uuid) -> DatabaseResult<FamilyTree> {
        let taxonomy = self.list_relation_types().await?;
        let profile = Self::find_profile(&self.conn, owner_id).await?;
        let (no_brother, no_sister) = profile
            .map(|p| (p.no_brother, p.no_sister))
            .unwrap_or_default();

        let members: HashMap<Uuid, member::Model> = FamilyMember::find()
            .filter(member::Column::UserId.eq(owner_id))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let edges = match members.values().find(|m| m.is_self) {
            Some(anchor) => {
                FamilyRelation::find()
                    .filter(relation::Column::PersonId.eq(anchor.id))
                    .order_by_asc(relation::Column::Id)
                    .all(&self.conn)
                    .await?
            }
            None => Vec::new(),
        };

        let mut tree = FamilyTree::new();
        for (category, types) in taxonomy {
            let slots: &mut BTreeMap<_, _> = tree.entry(category.name).or_default();
            for relation_type in types {
                let hidden = match Sibling::from_relation_type(&relation_type.name) {
                    Some(Sibling::Brother) => no_brother,
                    Some(Sibling::Sister) => no_sister,
                    None => false,
                };
                if hidden {
                    continue;
                }

                let member = edges
                    .iter()
                    .filter(|e| e.relation_type == relation_type.name)
                    .find_map(|e| members.get(&e.related_person_id))
                    .cloned();
                slots.insert(relation_type.name, member);
            }
        }

        Ok(tree)
    }

    /// Links two members of the owner's family.
    pub async fn add_relation(
        &self,
        owner_id: Uuid,
        person_id: Uuid,
        related_person_id: Uuid,
        relation_type: &str,
    ) -> DatabaseResult<relation::Model> {
        if person_id == related_person_id {
            return Err(DatabaseError::validation("a member cannot be related to itself"));
        }
        let relation_type = require_relation_type(&self.conn, relation_type).await?;
        owned_member(&self.conn, owner_id, person_id).await?;
        owned_member(&self.conn, owner_id, related_person_id).await?;

        link(&self.conn, person_id, related_person_id, relation_type).await
    }

    /// Creates a member (with address and an edge from the owner's node) when
    /// `member_id` is `None`, otherwise edits the member and its address in place.
    /// Editing never re-points the existing edge, whatever `relation_type` says.
    pub async fn add_or_update_member(
        &self,
        owner_id: Uuid,
        member_id: Option<Uuid>,
        input: MemberInput,
        relation_type: &str,
        address_input: AddressInput,
    ) -> DatabaseResult<member::Model> {
        check_member_input(&input)?;

        let txn = self.conn.begin().await?;
        let owner = Self::require_user(&txn, owner_id).await?;
        let relation_type = require_relation_type(&txn, relation_type).await?;
        Self::check_geo_refs(
            &txn,
            address_input.city_id,
            address_input.state_id,
            address_input.country_id,
        )
        .await?;

        let saved = match member_id {
            Some(member_id) => {
                let member = owned_member(&txn, owner_id, member_id).await?;

                let existing_address = match member.address_id {
                    Some(address_id) => address::Address::find_by_id(address_id).one(&txn).await?,
                    None => None,
                };
                let address_id = match existing_address {
                    Some(found) => {
                        let mut found = found.into_active_model();
                        found.apply(address_input);
                        found.update(&txn).await?.id
                    }
                    None => {
                        let mut fresh = address::ActiveModel::fresh(owner_id, AddressTag::FamilyMember);
                        fresh.apply(address_input);
                        fresh.insert(&txn).await?.id
                    }
                };

                let mut member = member.into_active_model();
                member.apply(input);
                member.address_id = Set(Some(address_id));
                member.update(&txn).await?
            }
            None => {
                let anchor = ensure_anchor(&txn, &owner).await?;

                let mut address = address::ActiveModel::fresh(owner_id, AddressTag::FamilyMember);
                address.apply(address_input);
                let address = address.insert(&txn).await?;

                let mut member = member::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(owner_id),
                    address_id: Set(Some(address.id)),
                    is_self: Set(false),
                    ..Default::default()
                };
                member.apply(input);
                let member = member.insert(&txn).await?;

                if let Some(sibling) = Sibling::from_relation_type(&relation_type) {
                    set_sibling_flag(&txn, owner_id, sibling, false).await?;
                }
                link(&txn, anchor.id, member.id, relation_type).await?;

                member
            }
        };

        txn.commit().await?;
        Ok(saved)
    }

    /// Declares that the owner has no brother (or sister). Every outgoing edge of that
    /// type from the owner's node is deleted; the members themselves stay.
    pub async fn set_no_sibling(&self, owner_id: Uuid, sibling: Sibling) -> DatabaseResult<u64> {
        let txn = self.conn.begin().await?;
        Self::require_user(&txn, owner_id).await?;

        set_sibling_flag(&txn, owner_id, sibling, true).await?;

        let removed = match anchor_of(&txn, owner_id).await? {
            Some(anchor) => {
                FamilyRelation::delete_many()
                    .filter(relation::Column::PersonId.eq(anchor.id))
                    .filter(relation::Column::RelationType.eq(sibling.relation_type()))
                    .exec(&txn)
                    .await?
                    .rows_affected
            }
            None => 0,
        };

        txn.commit().await?;
        tracing::debug!(owner_id = %owner_id, ?sibling, removed, "cleared sibling relations");

        Ok(removed)
    }

    /// Deletes a member of the requesting owner's family together with every edge
    /// that starts or ends at it and the member's own address.
    pub async fn delete_member(&self, member_id: Uuid, requesting_owner_id: Uuid) -> DatabaseResult<()> {
        let txn = self.conn.begin().await?;
        let member = owned_member(&txn, requesting_owner_id, member_id).await?;
        if member.is_self {
            return Err(DatabaseError::validation("the owner's own family node cannot be deleted"));
        }

        FamilyRelation::delete_many()
            .filter(
                relation::Column::PersonId
                    .eq(member.id)
                    .or(relation::Column::RelatedPersonId.eq(member.id)),
            )
            .exec(&txn)
            .await?;
        FamilyMember::delete_by_id(member.id).exec(&txn).await?;
        if let Some(address_id) = member.address_id {
            address::Address::delete_by_id(address_id).exec(&txn).await?;
        }
        txn.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_test_db;
    use crate::test_support::{Geo, address_in, new_user};

    fn person(first: &str) -> MemberInput {
        MemberInput {
            first_name: first.to_string(),
            last_name: "Kulkarni".to_string(),
            marital_status: Some("Married".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn adding_a_member_links_it_from_the_anchor() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let owner = db.create_user(new_user("owner")).await.unwrap();

        let father = db
            .add_or_update_member(owner.id, None, person("Suresh"), "Father", address_in(&geo, "Home"))
            .await
            .unwrap();

        let anchor = db.family_anchor(owner.id).await.unwrap().unwrap();
        assert_eq!(anchor.first_name, owner.first_name);
        let edges = db.relations_touching(father.id).await.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].person_id, anchor.id);
        assert_eq!(edges[0].relation_type, "Father");

        let tree = db.list_relations(owner.id).await.unwrap();
        assert_eq!(tree["Parents"]["Father"].as_ref().map(|m| m.id), Some(father.id));
        assert_eq!(tree["Parents"]["Mother"], None);
        assert!(tree["Siblings"].contains_key("Brother"));
        assert_eq!(db.list_family_members(owner.id).await.unwrap(), vec![father]);
    }

    #[tokio::test]
    async fn unknown_relation_or_geo_rolls_everything_back() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let owner = db.create_user(new_user("owner")).await.unwrap();

        let bad_type = db
            .add_or_update_member(owner.id, None, person("X"), "Neighbour", address_in(&geo, "Home"))
            .await;
        assert!(matches!(bad_type, Err(DatabaseError::Validation(_))));

        let mut nowhere = address_in(&geo, "Home");
        nowhere.state_id = 777;
        let bad_geo = db
            .add_or_update_member(owner.id, None, person("X"), "Mother", nowhere)
            .await;
        assert!(matches!(bad_geo, Err(DatabaseError::Validation(_))));

        assert!(db.family_anchor(owner.id).await.unwrap().is_none());
        assert!(db.list_family_members(owner.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn editing_updates_in_place_and_keeps_the_edge() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let owner = db.create_user(new_user("owner")).await.unwrap();
        let mother = db
            .add_or_update_member(owner.id, None, person("Sunita"), "Mother", address_in(&geo, "Old"))
            .await
            .unwrap();

        let mut changed = person("Sunita");
        changed.occupation = Some("Professor".into());
        let edited = db
            .add_or_update_member(owner.id, Some(mother.id), changed, "Aunt", address_in(&geo, "New"))
            .await
            .unwrap();

        assert_eq!(edited.id, mother.id);
        assert_eq!(edited.address_id, mother.address_id);
        assert_eq!(edited.occupation.as_deref(), Some("Professor"));
        let address = address::Address::find_by_id(edited.address_id.unwrap())
            .one(&db.conn)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(address.address1, "New");
        assert_eq!(address.tag, AddressTag::FamilyMember);

        let edges = db.relations_touching(mother.id).await.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relation_type, "Mother");
        assert_eq!(db.list_family_members(owner.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn members_of_another_owner_cannot_be_touched() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let owner = db.create_user(new_user("owner")).await.unwrap();
        let intruder = db.create_user(new_user("intruder")).await.unwrap();
        let uncle = db
            .add_or_update_member(owner.id, None, person("Mahesh"), "Uncle", address_in(&geo, "Home"))
            .await
            .unwrap();

        let edit = db
            .add_or_update_member(intruder.id, Some(uncle.id), person("Hacked"), "Uncle", address_in(&geo, "x"))
            .await;
        assert!(matches!(edit, Err(DatabaseError::Forbidden)));

        let delete = db.delete_member(uncle.id, intruder.id).await;
        assert!(matches!(delete, Err(DatabaseError::Forbidden)));
        assert_eq!(db.relations_touching(uncle.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_member_removes_edges_in_both_directions() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let owner = db.create_user(new_user("owner")).await.unwrap();
        let father = db
            .add_or_update_member(owner.id, None, person("Suresh"), "Father", address_in(&geo, "Home"))
            .await
            .unwrap();
        let grandfather = db
            .add_or_update_member(owner.id, None, person("Vasant"), "Grandfather", address_in(&geo, "Village"))
            .await
            .unwrap();
        db.add_relation(owner.id, grandfather.id, father.id, "Father")
            .await
            .unwrap();
        assert_eq!(db.relations_touching(father.id).await.unwrap().len(), 2);

        db.delete_member(father.id, owner.id).await.unwrap();

        assert!(db.relations_touching(father.id).await.unwrap().is_empty());
        assert_eq!(db.relations_touching(grandfather.id).await.unwrap().len(), 1);
        let address = address::Address::find_by_id(father.address_id.unwrap())
            .one(&db.conn)
            .await
            .unwrap();
        assert!(address.is_none());

        let again = db.delete_member(father.id, owner.id).await;
        assert!(matches!(again, Err(DatabaseError::NotFound)));
    }

    #[tokio::test]
    async fn the_anchor_cannot_be_deleted() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let owner = db.create_user(new_user("owner")).await.unwrap();
        db.add_or_update_member(owner.id, None, person("Suresh"), "Father", address_in(&geo, "Home"))
            .await
            .unwrap();
        let anchor = db.family_anchor(owner.id).await.unwrap().unwrap();

        let result = db.delete_member(anchor.id, owner.id).await;

        assert!(matches!(result, Err(DatabaseError::Validation(_))));
        assert!(db.family_anchor(owner.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn refused_deletes_leave_the_family_intact() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let owner = db.create_user(new_user("owner")).await.unwrap();
        let intruder = db.create_user(new_user("intruder")).await.unwrap();
        let father = db
            .add_or_update_member(owner.id, None, person("Suresh"), "Father", address_in(&geo, "Home"))
            .await
            .unwrap();
        let anchor = db.family_anchor(owner.id).await.unwrap().unwrap();

        assert!(matches!(
            db.delete_member(anchor.id, owner.id).await,
            Err(DatabaseError::Validation(_))
        ));
        assert!(matches!(
            db.delete_member(father.id, intruder.id).await,
            Err(DatabaseError::Forbidden)
        ));
        assert!(matches!(
            db.delete_member(Uuid::new_v4(), owner.id).await,
            Err(DatabaseError::NotFound)
        ));

        // each refusal rolled back, so the next delete runs normally
        assert_eq!(db.relations_touching(father.id).await.unwrap().len(), 1);
        db.delete_member(father.id, owner.id).await.unwrap();
        assert!(db.relations_touching(father.id).await.unwrap().is_empty());
        assert!(db.family_anchor(owner.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_edges_are_rejected() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let owner = db.create_user(new_user("owner")).await.unwrap();
        let father = db
            .add_or_update_member(owner.id, None, person("Suresh"), "Father", address_in(&geo, "Home"))
            .await
            .unwrap();
        let anchor = db.family_anchor(owner.id).await.unwrap().unwrap();

        let duplicate = db.add_relation(owner.id, anchor.id, father.id, "Father").await;
        assert!(matches!(duplicate, Err(DatabaseError::Validation(_))));

        // a different type between the same pair is a different edge
        db.add_relation(owner.id, anchor.id, father.id, "Uncle").await.unwrap();
        assert_eq!(db.relations_touching(father.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn declaring_no_brother_drops_the_edge_and_the_slot() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let owner = db.create_user(new_user("owner")).await.unwrap();
        let brother = db
            .add_or_update_member(owner.id, None, person("Rohan"), "Brother", address_in(&geo, "Home"))
            .await
            .unwrap();

        assert_eq!(db.set_no_sibling(owner.id, Sibling::Brother).await.unwrap(), 1);

        assert!(db.relations_touching(brother.id).await.unwrap().is_empty());
        let tree = db.list_relations(owner.id).await.unwrap();
        assert!(!tree["Siblings"].contains_key("Brother"));
        assert!(tree["Siblings"].contains_key("Sister"));
        let profile = db.get_profile(owner.id).await.unwrap().unwrap();
        assert!(profile.no_brother);

        // adding a brother again brings the slot back
        db.add_or_update_member(owner.id, None, person("Rahul"), "Brother", address_in(&geo, "Home"))
            .await
            .unwrap();
        let tree = db.list_relations(owner.id).await.unwrap();
        assert!(tree["Siblings"]["Brother"].is_some());
    }
}
