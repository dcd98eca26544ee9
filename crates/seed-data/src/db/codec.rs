//! Mapping between ledger records and DynamoDB attribute maps.
//!
//! This is the only place that knows about `AttributeValue`. Optional
//! attributes are left out of the item entirely rather than written as NULL,
//! so sparse indexes such as `GSI4-Supersedes` only see decisions that
//! actually supersede something.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use ledger::schema::*;
use ledger::{
    Decision, LedgerError, Participant, Project, ProjectMember, format_timestamp,
    parse_timestamp,
};
use serde_json::{Value, json};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// A DynamoDB item as sent to `PutItem`.
pub type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Missing attribute: {0}")]
    Missing(&'static str),

    #[error("Attribute {0} has the wrong type")]
    WrongType(&'static str),

    #[error("Attribute {attribute} is invalid: {source}")]
    Invalid {
        attribute: &'static str,
        #[source]
        source: LedgerError,
    },

    #[error("Attribute {0} is not a valid UUID")]
    InvalidId(&'static str),

    #[error("Expected entity type {expected}, found {found}")]
    EntityType {
        expected: &'static str,
        found: String,
    },

    #[error("Key {0} does not match the record it holds")]
    KeyMismatch(&'static str),

    #[error("Status index {found} does not match {expected}")]
    StaleStatusIndex { expected: String, found: String },
}

/// Encodes a record as a complete table item, keys included.
pub trait ToItem {
    fn to_item(&self) -> Item;
}

/// Decodes a record from a table item.
pub trait FromItem: Sized {
    fn from_item(item: &Item) -> Result<Self, CodecError>;
}

fn string(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

fn timestamp(at: OffsetDateTime) -> AttributeValue {
    AttributeValue::S(format_timestamp(at))
}

fn string_list(values: &[String]) -> AttributeValue {
    AttributeValue::L(values.iter().map(|v| string(v.as_str())).collect())
}

fn keyed(pk: String, sk: String, entity_type: EntityType) -> Item {
    HashMap::from([
        (ATTR_PK.to_string(), string(pk)),
        (ATTR_SK.to_string(), string(sk)),
        (ATTR_ENTITY_TYPE.to_string(), string(entity_type.as_str())),
    ])
}

fn get_s<'a>(item: &'a Item, name: &'static str) -> Result<&'a str, CodecError> {
    item.get(name)
        .ok_or(CodecError::Missing(name))?
        .as_s()
        .map(String::as_str)
        .map_err(|_| CodecError::WrongType(name))
}

fn get_opt_s<'a>(item: &'a Item, name: &'static str) -> Result<Option<&'a str>, CodecError> {
    match item.get(name) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(value) => value
            .as_s()
            .map(|s| Some(s.as_str()))
            .map_err(|_| CodecError::WrongType(name)),
    }
}

fn get_bool(item: &Item, name: &'static str) -> Result<bool, CodecError> {
    item.get(name)
        .ok_or(CodecError::Missing(name))?
        .as_bool()
        .copied()
        .map_err(|_| CodecError::WrongType(name))
}

fn get_list<'a>(item: &'a Item, name: &'static str) -> Result<&'a [AttributeValue], CodecError> {
    item.get(name)
        .ok_or(CodecError::Missing(name))?
        .as_l()
        .map(Vec::as_slice)
        .map_err(|_| CodecError::WrongType(name))
}

fn get_string_list(item: &Item, name: &'static str) -> Result<Vec<String>, CodecError> {
    get_list(item, name)?
        .iter()
        .map(|v| v.as_s().cloned().map_err(|_| CodecError::WrongType(name)))
        .collect()
}

fn get_uuid(item: &Item, name: &'static str) -> Result<Uuid, CodecError> {
    Uuid::parse_str(get_s(item, name)?).map_err(|_| CodecError::InvalidId(name))
}

fn get_timestamp(item: &Item, name: &'static str) -> Result<OffsetDateTime, CodecError> {
    parse_timestamp(get_s(item, name)?).map_err(|source| CodecError::Invalid {
        attribute: name,
        source,
    })
}

fn get_parsed<T>(item: &Item, name: &'static str) -> Result<T, CodecError>
where
    T: std::str::FromStr<Err = LedgerError>,
{
    get_s(item, name)?
        .parse()
        .map_err(|source| CodecError::Invalid {
            attribute: name,
            source,
        })
}

fn expect_entity(item: &Item, expected: EntityType) -> Result<(), CodecError> {
    let found = get_s(item, ATTR_ENTITY_TYPE)?;
    if found != expected.as_str() {
        return Err(CodecError::EntityType {
            expected: expected.as_str(),
            found: found.to_string(),
        });
    }
    Ok(())
}

fn expect_key(item: &Item, name: &'static str, expected: &str) -> Result<(), CodecError> {
    if get_s(item, name)? != expected {
        return Err(CodecError::KeyMismatch(name));
    }
    Ok(())
}

impl ToItem for Project {
    fn to_item(&self) -> Item {
        let mut item = keyed(self.pk(), SK_METADATA.to_string(), EntityType::Project);
        item.insert(ATTR_ID.to_string(), string(self.id.to_string()));
        item.insert(ATTR_NAME.to_string(), string(self.name.as_str()));
        item.insert(ATTR_DESCRIPTION.to_string(), string(self.description.as_str()));
        item.insert(
            ATTR_SLACK_CHANNELS.to_string(),
            string_list(&self.slack_channels),
        );
        item.insert(
            ATTR_AUTO_CONFIRM.to_string(),
            AttributeValue::Bool(self.auto_confirm_meeting_decisions),
        );
        item.insert(
            ATTR_NOTIFICATION_CHANNEL.to_string(),
            string(self.notification_channel.as_str()),
        );
        item.insert(ATTR_CREATED_AT.to_string(), timestamp(self.created_at));
        item.insert(ATTR_UPDATED_AT.to_string(), timestamp(self.updated_at));
        item
    }
}

impl FromItem for Project {
    fn from_item(item: &Item) -> Result<Self, CodecError> {
        expect_entity(item, EntityType::Project)?;
        let project = Project {
            id: get_uuid(item, ATTR_ID)?,
            name: get_s(item, ATTR_NAME)?.to_string(),
            description: get_s(item, ATTR_DESCRIPTION)?.to_string(),
            slack_channels: get_string_list(item, ATTR_SLACK_CHANNELS)?,
            auto_confirm_meeting_decisions: get_bool(item, ATTR_AUTO_CONFIRM)?,
            notification_channel: get_s(item, ATTR_NOTIFICATION_CHANNEL)?.to_string(),
            created_at: get_timestamp(item, ATTR_CREATED_AT)?,
            updated_at: get_timestamp(item, ATTR_UPDATED_AT)?,
        };
        expect_key(item, ATTR_PK, &project.pk())?;
        expect_key(item, ATTR_SK, SK_METADATA)?;
        Ok(project)
    }
}

impl ToItem for ProjectMember {
    fn to_item(&self) -> Item {
        let mut item = keyed(self.pk(), self.sk(), EntityType::ProjectMember);
        item.insert(ATTR_USER_ID.to_string(), string(self.user_id.as_str()));
        item.insert(
            ATTR_PROJECT_ID.to_string(),
            string(self.project_id.to_string()),
        );
        item.insert(ATTR_ROLE.to_string(), string(self.role.as_str()));
        item.insert(ATTR_CREATED_AT.to_string(), timestamp(self.created_at));
        item
    }
}

impl FromItem for ProjectMember {
    fn from_item(item: &Item) -> Result<Self, CodecError> {
        expect_entity(item, EntityType::ProjectMember)?;
        let member = ProjectMember {
            project_id: get_uuid(item, ATTR_PROJECT_ID)?,
            user_id: get_s(item, ATTR_USER_ID)?.to_string(),
            role: get_parsed(item, ATTR_ROLE)?,
            created_at: get_timestamp(item, ATTR_CREATED_AT)?,
        };
        expect_key(item, ATTR_PK, &member.pk())?;
        expect_key(item, ATTR_SK, &member.sk())?;
        Ok(member)
    }
}

impl ToItem for Participant {
    fn to_item(&self) -> Item {
        HashMap::from([
            (ATTR_PARTICIPANT_NAME.to_string(), string(self.name.as_str())),
            (
                ATTR_PARTICIPANT_ROLE.to_string(),
                string(self.role.as_str()),
            ),
        ])
    }
}

impl FromItem for Participant {
    fn from_item(item: &Item) -> Result<Self, CodecError> {
        Ok(Participant {
            name: get_s(item, ATTR_PARTICIPANT_NAME)?.to_string(),
            role: get_parsed(item, ATTR_PARTICIPANT_ROLE)?,
        })
    }
}

impl ToItem for Decision {
    fn to_item(&self) -> Item {
        let mut item = keyed(self.pk(), SK_METADATA.to_string(), EntityType::Decision);
        item.insert(ATTR_ID.to_string(), string(self.id.to_string()));
        item.insert(
            ATTR_PROJECT_ID.to_string(),
            string(self.project_id.to_string()),
        );
        item.insert(ATTR_SUMMARY.to_string(), string(self.summary.as_str()));
        item.insert(ATTR_CONTEXT.to_string(), string(self.context.as_str()));
        item.insert(ATTR_RAW_CONTENT.to_string(), string(self.raw_content.as_str()));
        item.insert(ATTR_STATUS.to_string(), string(self.status.as_str()));
        if let Some(supersedes_id) = self.supersedes_id {
            item.insert(
                ATTR_SUPERSEDES_ID.to_string(),
                string(supersedes_id.to_string()),
            );
        }
        item.insert(
            ATTR_SOURCE_TYPE.to_string(),
            string(self.source_type.as_str()),
        );
        item.insert(
            ATTR_SOURCE_CHANNEL.to_string(),
            string(self.source_channel.as_str()),
        );
        if let Some(url) = &self.source_url {
            item.insert(ATTR_SOURCE_URL.to_string(), string(url.as_str()));
        }
        item.insert(
            ATTR_SOURCE_TIMESTAMP.to_string(),
            timestamp(self.source_timestamp),
        );
        item.insert(ATTR_AUTHOR.to_string(), string(self.author.as_str()));
        item.insert(
            ATTR_PARTICIPANTS.to_string(),
            AttributeValue::L(
                self.participants
                    .iter()
                    .map(|p| AttributeValue::M(p.to_item()))
                    .collect(),
            ),
        );
        item.insert(ATTR_TAGS.to_string(), string_list(&self.tags));
        item.insert(ATTR_CREATED_AT.to_string(), timestamp(self.created_at));
        item.insert(ATTR_UPDATED_AT.to_string(), timestamp(self.updated_at));
        item.insert(
            ATTR_STATUS_INDEX.to_string(),
            string(self.status_index_key()),
        );
        item
    }
}

impl FromItem for Decision {
    fn from_item(item: &Item) -> Result<Self, CodecError> {
        expect_entity(item, EntityType::Decision)?;

        let participants = get_list(item, ATTR_PARTICIPANTS)?
            .iter()
            .map(|value| {
                value
                    .as_m()
                    .map_err(|_| CodecError::WrongType(ATTR_PARTICIPANTS))
                    .and_then(Participant::from_item)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let supersedes_id = get_opt_s(item, ATTR_SUPERSEDES_ID)?
            .map(|id| Uuid::parse_str(id).map_err(|_| CodecError::InvalidId(ATTR_SUPERSEDES_ID)))
            .transpose()?;

        let decision = Decision {
            id: get_uuid(item, ATTR_ID)?,
            project_id: get_uuid(item, ATTR_PROJECT_ID)?,
            summary: get_s(item, ATTR_SUMMARY)?.to_string(),
            context: get_s(item, ATTR_CONTEXT)?.to_string(),
            raw_content: get_s(item, ATTR_RAW_CONTENT)?.to_string(),
            status: get_parsed(item, ATTR_STATUS)?,
            supersedes_id,
            source_type: get_parsed(item, ATTR_SOURCE_TYPE)?,
            source_channel: get_s(item, ATTR_SOURCE_CHANNEL)?.to_string(),
            source_url: get_opt_s(item, ATTR_SOURCE_URL)?.map(str::to_string),
            source_timestamp: get_timestamp(item, ATTR_SOURCE_TIMESTAMP)?,
            author: get_s(item, ATTR_AUTHOR)?.to_string(),
            participants,
            tags: get_string_list(item, ATTR_TAGS)?,
            created_at: get_timestamp(item, ATTR_CREATED_AT)?,
            updated_at: get_timestamp(item, ATTR_UPDATED_AT)?,
        };

        expect_key(item, ATTR_PK, &decision.pk())?;
        expect_key(item, ATTR_SK, SK_METADATA)?;

        let found = get_s(item, ATTR_STATUS_INDEX)?;
        let expected = decision.status_index_key();
        if found != expected {
            return Err(CodecError::StaleStatusIndex {
                expected,
                found: found.to_string(),
            });
        }

        Ok(decision)
    }
}

/// Renders an item in DynamoDB's JSON format, as accepted by
/// `aws dynamodb put-item --item`.
pub fn item_to_json(item: &Item) -> Value {
    Value::Object(
        item.iter()
            .map(|(name, value)| (name.clone(), attribute_to_json(value)))
            .collect(),
    )
}

fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => json!({ "S": s }),
        AttributeValue::N(n) => json!({ "N": n }),
        AttributeValue::Bool(b) => json!({ "BOOL": b }),
        AttributeValue::Null(b) => json!({ "NULL": b }),
        AttributeValue::Ss(values) => json!({ "SS": values }),
        AttributeValue::Ns(values) => json!({ "NS": values }),
        AttributeValue::L(values) => {
            json!({ "L": values.iter().map(attribute_to_json).collect::<Vec<_>>() })
        }
        AttributeValue::M(map) => json!({ "M": item_to_json(map) }),
        // Binary attributes are never written
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger::{DecisionStatus, MemberRole, ParticipantRole, SourceType};
    use time::macros::datetime;

    const AT: OffsetDateTime = datetime!(2025-03-01 12:00:00 UTC);

    fn project() -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Mobile App v2".to_string(),
            description: "Next generation mobile application".to_string(),
            slack_channels: vec!["#mobile".to_string(), "#product".to_string()],
            auto_confirm_meeting_decisions: true,
            notification_channel: "#mobile-updates".to_string(),
            created_at: AT,
            updated_at: AT,
        }
    }

    fn decision(project_id: Uuid) -> Decision {
        Decision {
            id: Uuid::new_v4(),
            project_id,
            summary: "Evaluating React Native vs Flutter for mobile app".to_string(),
            context: "Will decide after POC phase.".to_string(),
            raw_content: "We need to decide @DecisionLedger".to_string(),
            status: DecisionStatus::Open,
            supersedes_id: None,
            source_type: SourceType::Meeting,
            source_channel: "Weekly Standup".to_string(),
            source_url: None,
            source_timestamp: AT,
            author: "U003".to_string(),
            participants: vec![
                Participant::new("Charlie", ParticipantRole::Contributor),
                Participant::new("Diana", ParticipantRole::Contributor),
            ],
            tags: vec!["mobile".to_string(), "framework".to_string()],
            created_at: AT,
            updated_at: AT,
        }
    }

    #[test]
    fn test_project_item_shape() {
        let p = project();
        let item = p.to_item();

        assert_eq!(item[ATTR_PK], string(format!("PROJECT#{}", p.id)));
        assert_eq!(item[ATTR_SK], string("METADATA"));
        assert_eq!(item[ATTR_ENTITY_TYPE], string("PROJECT"));
        assert_eq!(item[ATTR_AUTO_CONFIRM], AttributeValue::Bool(true));
        assert_eq!(
            item[ATTR_SLACK_CHANNELS],
            AttributeValue::L(vec![string("#mobile"), string("#product")])
        );
        assert_eq!(item[ATTR_CREATED_AT], string("2025-03-01T12:00:00.000000Z"));
        assert_eq!(item.len(), 11);

        assert_eq!(Project::from_item(&item).unwrap(), p);
    }

    #[test]
    fn test_member_item_shape() {
        let member = ProjectMember {
            project_id: Uuid::new_v4(),
            user_id: "U003".to_string(),
            role: MemberRole::Admin,
            created_at: AT,
        };
        let item = member.to_item();

        assert_eq!(item[ATTR_SK], string("MEMBER#U003"));
        assert_eq!(item[ATTR_ENTITY_TYPE], string("PROJECT_MEMBER"));
        assert_eq!(item[ATTR_ROLE], string("admin"));
        assert_eq!(
            item[ATTR_PROJECT_ID],
            string(member.project_id.to_string())
        );
        assert_eq!(ProjectMember::from_item(&item).unwrap(), member);
    }

    #[test]
    fn test_decision_omits_absent_optionals() {
        let d = decision(Uuid::new_v4());
        let item = d.to_item();

        assert!(!item.contains_key(ATTR_SUPERSEDES_ID));
        assert!(!item.contains_key(ATTR_SOURCE_URL));
        assert_eq!(
            item[ATTR_STATUS_INDEX],
            string(format!("open#{}", d.project_id))
        );
        assert_eq!(
            item[ATTR_PARTICIPANTS],
            AttributeValue::L(vec![
                AttributeValue::M(HashMap::from([
                    ("name".to_string(), string("Charlie")),
                    ("role".to_string(), string("contributor")),
                ])),
                AttributeValue::M(HashMap::from([
                    ("name".to_string(), string("Diana")),
                    ("role".to_string(), string("contributor")),
                ])),
            ])
        );
        assert_eq!(Decision::from_item(&item).unwrap(), d);
    }

    #[test]
    fn test_decision_with_supersession() {
        let mut d = decision(Uuid::new_v4());
        let earlier = Uuid::new_v4();
        d.status = DecisionStatus::Confirmed;
        d.supersedes_id = Some(earlier);
        d.source_url = Some("https://slack.com/archives/C001/p1234567892".to_string());

        let item = d.to_item();
        assert_eq!(item[ATTR_SUPERSEDES_ID], string(earlier.to_string()));
        assert_eq!(
            item[ATTR_STATUS_INDEX],
            string(format!("confirmed#{}", d.project_id))
        );
        assert_eq!(Decision::from_item(&item).unwrap(), d);
    }

    #[test]
    fn test_item_json() {
        let mut d = decision(Uuid::new_v4());
        d.source_url = Some("https://slack.com/archives/C123/p1".to_string());
        let value = item_to_json(&d.to_item());

        assert_eq!(value["SK"], json!({ "S": "METADATA" }));
        assert_eq!(value["entity_type"], json!({ "S": "DECISION" }));
        assert_eq!(
            value["gsi3_pk"],
            json!({ "S": format!("open#{}", d.project_id) })
        );
        assert_eq!(
            value["created_at"],
            json!({ "S": "2025-03-01T12:00:00.000000Z" })
        );
        assert_eq!(
            value["participants"]["L"][0],
            json!({ "M": { "name": { "S": "Charlie" }, "role": { "S": "contributor" } } })
        );
        assert_eq!(
            value["tags"],
            json!({ "L": [{ "S": "mobile" }, { "S": "framework" }] })
        );
        assert_eq!(value["source_url"]["S"], "https://slack.com/archives/C123/p1");
        assert!(value.get("supersedes_id").is_none());

        let project = item_to_json(&project().to_item());
        assert_eq!(project["auto_confirm_meeting_decisions"], json!({ "BOOL": true }));
    }

    #[test]
    fn test_decode_errors() {
        let d = decision(Uuid::new_v4());

        let mut missing = d.to_item();
        missing.remove(ATTR_SUMMARY);
        assert!(matches!(
            Decision::from_item(&missing),
            Err(CodecError::Missing("summary"))
        ));

        let mut wrong = d.to_item();
        wrong.insert(ATTR_TAGS.to_string(), string("mobile"));
        assert!(matches!(
            Decision::from_item(&wrong),
            Err(CodecError::WrongType("tags"))
        ));

        let mut stale = d.to_item();
        stale.insert(
            ATTR_STATUS_INDEX.to_string(),
            string(format!("confirmed#{}", d.project_id)),
        );
        assert!(matches!(
            Decision::from_item(&stale),
            Err(CodecError::StaleStatusIndex { .. })
        ));

        let mut unknown = d.to_item();
        unknown.insert(ATTR_STATUS.to_string(), string("archived"));
        assert!(matches!(
            Decision::from_item(&unknown),
            Err(CodecError::Invalid {
                attribute: "status",
                ..
            })
        ));
    }

    #[test]
    fn test_entity_type_mismatch() {
        let item = project().to_item();
        assert!(matches!(
            Decision::from_item(&item),
            Err(CodecError::EntityType { .. })
        ));
    }
}
