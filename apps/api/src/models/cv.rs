use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output of text extraction, stored alongside the uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CvStatus {
    Processed,
    Failed,
}

impl CvStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CvStatus::Processed => "processed",
            CvStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "processed" => Some(CvStatus::Processed),
            "failed" => Some(CvStatus::Failed),
            _ => None,
        }
    }
}

/// Who uploaded a CV: a logged-in user, or an anonymous applicant who gave a name.
#[derive(Debug, Clone, PartialEq)]
pub enum CvOwner {
    User(i32),
    Public {
        first_name: String,
        last_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvRecord {
    pub id: i32,
    pub user_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub original_file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub extracted_data: ExtractedData,
    pub status: CvStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A CV ready to be stored; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewCv {
    pub owner: CvOwner,
    pub original_file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub extracted_data: ExtractedData,
    pub status: CvStatus,
    pub error_message: Option<String>,
}

impl NewCv {
    pub fn into_record(self, id: i32, created_at: DateTime<Utc>) -> CvRecord {
        let (user_id, first_name, last_name) = match self.owner {
            CvOwner::User(user_id) => (Some(user_id), None, None),
            CvOwner::Public {
                first_name,
                last_name,
            } => (None, Some(first_name), Some(last_name)),
        };
        CvRecord {
            id,
            user_id,
            first_name,
            last_name,
            original_file_name: self.original_file_name,
            file_path: self.file_path,
            file_type: self.file_type,
            file_size: self.file_size,
            extracted_data: self.extracted_data,
            status: self.status,
            error_message: self.error_message,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_forms_agree_with_serde() {
        for status in [CvStatus::Processed, CvStatus::Failed] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(CvStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CvStatus::parse("queued"), None);
    }

    #[test]
    fn test_public_owner_fills_name_fields() {
        let cv = NewCv {
            owner: CvOwner::Public {
                first_name: "Giulia".to_string(),
                last_name: "Rossi".to_string(),
            },
            original_file_name: "cv.pdf".to_string(),
            file_path: "uploads/public/1-2.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 1024,
            extracted_data: ExtractedData::default(),
            status: CvStatus::Processed,
            error_message: None,
        };
        let record = cv.into_record(3, Utc::now());
        assert_eq!(record.user_id, None);
        assert_eq!(record.first_name.as_deref(), Some("Giulia"));
        assert_eq!(record.last_name.as_deref(), Some("Rossi"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["originalFileName"], "cv.pdf");
        assert_eq!(json["extractedData"]["text"], "");
        assert_eq!(json["status"], "processed");
    }
}
