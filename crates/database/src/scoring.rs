//! Profile completeness, a derived 0..=100 value that is never stored.

use crate::ProfileAggregate;

const MAX_SCORE: u32 = 100;

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

fn filled_opt(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(filled)
}

fn points(present: bool, weight: u32) -> u32 {
    if present { weight } else { 0 }
}

/// Weighted presence of the aggregate's fields. Every check only ever adds, so filling
/// in another field can never lower the result.
pub fn score(aggregate: &ProfileAggregate) -> u8 {
    let user = &aggregate.user;
    let mut total = [
        filled(&user.first_name),
        filled(&user.last_name),
        filled(&user.username),
        filled(&user.email),
        filled_opt(&user.phone),
    ]
    .into_iter()
    .map(|present| points(present, 2))
    .sum::<u32>();

    if let Some(profile) = &aggregate.profile {
        total += points(aggregate.date_of_birth.is_some(), 2);
        total += points(filled_opt(&profile.birth_time), 1);
        total += points(filled_opt(&profile.gender), 1);
        total += points(filled_opt(&profile.looking_for), 1);
        total += points(profile.height.is_some(), 1);
        total += points(filled_opt(&profile.bio), 1);
        total += points(filled_opt(&profile.linkedin_url), 1);
        total += points(
            filled_opt(&profile.birth_city)
                || filled_opt(&profile.birth_state)
                || filled_opt(&profile.birth_country),
            2,
        );
        // kundali document, kept in the picture reference
        total += points(filled_opt(&profile.profile_picture), 4);
    }

    total += points(aggregate.addresses.iter().any(|a| a.is_complete()), 4);

    total += points(aggregate.primary_image.is_some(), 4);
    let additional = aggregate.images.iter().filter(|i| !i.is_primary).count();
    total += match additional {
        0 => 0,
        1 => 2,
        2 => 3,
        _ => 4,
    };

    total += 2 * aggregate.family_members.len().min(3) as u32;
    total += points(aggregate.educations.iter().any(|e| e.is_complete()), 5);
    total += points(
        aggregate
            .professional_details
            .iter()
            .any(|p| p.has_occupation_and_company()),
        5,
    );
    total += points(!aggregate.alternate_phones.is_empty(), 2);
    total += aggregate.languages.len().min(3) as u32;

    (total * 100 / MAX_SCORE).min(100) as u8
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::{address, education, family, language, phone_alternate, professional, profile, profile_image, user};

    fn bare() -> ProfileAggregate {
        let now = Utc::now();
        ProfileAggregate {
            user: user::Model {
                id: Uuid::new_v4(),
                username: "leela".into(),
                email: "leela@example.com".into(),
                first_name: "".into(),
                last_name: "".into(),
                phone: None,
                password_hash: "hashed".into(),
                created_at: now,
                updated_at: now,
            },
            profile: None,
            date_of_birth: None,
            addresses: vec![],
            educations: vec![],
            professional_details: vec![],
            family_members: vec![],
            alternate_phones: vec![],
            images: vec![],
            primary_image: None,
            languages: vec![],
        }
    }

    fn empty_profile(user_id: Uuid) -> profile::Model {
        profile::Model {
            id: Uuid::new_v4(),
            user_id,
            gender: None,
            looking_for: None,
            date_of_birth: None,
            legacy_date_of_birth: None,
            birth_time: None,
            birth_village: None,
            birth_city: None,
            birth_state: None,
            birth_country: None,
            height: None,
            bio: None,
            profile_picture: None,
            linkedin_url: None,
            no_brother: false,
            no_sister: false,
        }
    }

    fn image(user_id: Uuid, is_primary: bool) -> profile_image::Model {
        profile_image::Model {
            id: Uuid::new_v4(),
            user_id,
            image_url: "https://bucket/x.png".into(),
            is_primary,
            uploaded_at: Utc::now(),
        }
    }

    fn member(user_id: Uuid, name: &str) -> family::member::Model {
        family::member::Model {
            id: Uuid::new_v4(),
            user_id,
            first_name: name.into(),
            last_name: "Joshi".into(),
            occupation: None,
            contact_number: None,
            age: None,
            email: None,
            marital_status: None,
            address_id: None,
            is_self: false,
        }
    }

    fn language(user_id: Uuid, name: &str) -> language::Model {
        language::Model {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            proficiency: None,
            certification: None,
            notes: None,
        }
    }

    /// Each step fills in one more group of fields.
    const STEPS: &[fn(&mut ProfileAggregate)] = &[
        |a| a.user.first_name = "Leela".into(),
        |a| a.user.last_name = "Joshi".into(),
        |a| a.user.phone = Some("9811111111".into()),
        |a| a.profile = Some(empty_profile(a.user.id)),
        |a| {
            if let Some(p) = a.profile.as_mut() {
                p.gender = Some("Female".into());
                p.height = Some(160);
            }
        },
        |a| a.date_of_birth = NaiveDate::from_ymd_opt(1995, 3, 4),
        |a| {
            if let Some(p) = a.profile.as_mut() {
                p.birth_state = Some("Goa".into());
                p.profile_picture = Some("kundali.pdf".into());
            }
        },
        |a| {
            a.addresses.push(address::Model {
                id: Uuid::new_v4(),
                user_id: a.user.id,
                address1: "7 Lake View".into(),
                address2: None,
                address3: None,
                city_id: 1,
                state_id: 1,
                country_id: 1,
                zipcode: "403001".into(),
                tag: address::AddressTag::Current,
            })
        },
        |a| {
            let primary = image(a.user.id, true);
            a.primary_image = Some(primary.clone());
            a.images.push(primary);
        },
        |a| a.images.push(image(a.user.id, false)),
        |a| a.images.push(image(a.user.id, false)),
        |a| a.images.push(image(a.user.id, false)),
        |a| a.images.push(image(a.user.id, false)),
        |a| a.family_members.push(member(a.user.id, "Anil")),
        |a| a.family_members.push(member(a.user.id, "Asha")),
        |a| a.family_members.push(member(a.user.id, "Arun")),
        |a| a.family_members.push(member(a.user.id, "Ajay")),
        |a| {
            a.educations.push(education::Model {
                id: Uuid::new_v4(),
                user_id: a.user.id,
                degree: Some("B.E.".into()),
                specialization: Some("Civil".into()),
                university: Some("Goa University".into()),
                institution: Some("GEC".into()),
                year_of_passing: Some(2017),
                grade: None,
            })
        },
        |a| {
            a.professional_details.push(professional::Model {
                id: Uuid::new_v4(),
                user_id: a.user.id,
                occupation: Some("Engineer".into()),
                company_name: Some("Konkan Rail".into()),
                designation: None,
                years_of_experience: None,
                package: None,
                turn_over: None,
                location: None,
                employment_type: None,
            })
        },
        |a| {
            a.alternate_phones.push(phone_alternate::Model {
                id: Uuid::new_v4(),
                user_id: a.user.id,
                phone: "9822222222".into(),
            })
        },
        |a| a.languages.push(language(a.user.id, "Konkani")),
        |a| a.languages.push(language(a.user.id, "Marathi")),
        |a| a.languages.push(language(a.user.id, "English")),
        |a| a.languages.push(language(a.user.id, "Hindi")),
    ];

    #[test]
    fn bare_account_scores_username_and_email_only() {
        assert_eq!(score(&bare()), 4);
    }

    #[test]
    fn filling_fields_never_lowers_the_score() {
        let mut aggregate = bare();
        let mut previous = score(&aggregate);

        for step in STEPS {
            step(&mut aggregate);
            let current = score(&aggregate);
            assert!(current >= previous, "{current} < {previous}");
            assert!(current <= 100);
            previous = current;
        }

        assert_eq!(score(&aggregate), score(&aggregate));
        // everything but birth time, looking for, bio and linkedin
        assert_eq!(previous, 53);
    }

    #[test]
    fn capped_groups_stop_counting() {
        let mut aggregate = bare();
        let id = aggregate.user.id;
        for name in ["a", "b", "c"] {
            aggregate.languages.push(language(id, name));
        }
        let three = score(&aggregate);
        aggregate.languages.push(language(id, "d"));

        assert_eq!(score(&aggregate), three);
    }
}
