use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupList {
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderItem {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub files: Vec<FileItem>,
    #[serde(default)]
    pub folders: Vec<FolderItem>,
}

/// Folder tree of a single group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStructure {
    pub group: String,
    #[serde(default)]
    pub files: Vec<FileItem>,
    #[serde(default)]
    pub folders: Vec<FolderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub group: String,
    pub file: String,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    #[serde(rename = "expiresIn", default)]
    pub expires_in: String,
}

/// Marking as returned by the server.
///
/// Generic over the tag set so an unknown `marking_type` fails this record's
/// deserialization instead of being coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkingRecord<M> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub group_name: String,
    pub file_path: String,
    pub row_number: usize,
    pub marking_type: M,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Upsert body for `POST /api/markings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMarking<M> {
    pub group_name: String,
    pub file_path: String,
    pub row_number: usize,
    pub marking_type: M,
    pub notes: Option<String>,
}

/// Body for `DELETE /api/markings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkingKey {
    pub group_name: String,
    pub file_path: String,
    pub row_number: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_structure_missing_lists_default_to_empty() {
        let structure: GroupStructure = serde_json::from_str(r#"{"group":"Kanji [JP]"}"#).unwrap();
        assert!(structure.files.is_empty());
        assert!(structure.folders.is_empty());
    }

    #[test]
    fn test_new_marking_uses_camel_case() {
        let body = NewMarking {
            group_name: "g".to_string(),
            file_path: "words.csv".to_string(),
            row_number: 4,
            marking_type: "learned",
            notes: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["groupName"], "g");
        assert_eq!(json["filePath"], "words.csv");
        assert_eq!(json["rowNumber"], 4);
        assert_eq!(json["markingType"], "learned");
    }

    #[test]
    fn test_login_response_reads_expires_in() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"message":"ok","token":"abc","expiresIn":"24h"}"#).unwrap();
        assert_eq!(resp.token, "abc");
        assert_eq!(resp.expires_in, "24h");
    }
}
