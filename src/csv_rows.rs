use serde::Deserialize;

use crate::models::{is_valid_stars, AuthenticityLabel, BusinessId, ReviewRecord};

/// Row of the business export. Extra columns are ignored; headers are
/// trimmed by the reader before matching.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessCsvRow {
    pub business_id: String,
    pub name: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCsvRow {
    pub business_id: String,
    #[serde(default)]
    pub review: Option<String>,
    pub stars: f64,
    pub authenticity_label: i64,
}

impl ReviewCsvRow {
    /// Validate star range and label domain.
    pub fn into_record(self) -> Result<(BusinessId, ReviewRecord), String> {
        if !is_valid_stars(self.stars) {
            return Err(format!("stars {} outside [0, 5]", self.stars));
        }
        let label = AuthenticityLabel::try_from(self.authenticity_label).map_err(|e| e.to_string())?;
        let text = self.review.filter(|t| !t.trim().is_empty());
        Ok((
            BusinessId(self.business_id),
            ReviewRecord {
                text,
                stars: self.stars,
                authenticity_label: label,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(stars: f64, label: i64) -> ReviewCsvRow {
        ReviewCsvRow {
            business_id: "b1".into(),
            review: Some("Lovely place".into()),
            stars,
            authenticity_label: label,
        }
    }

    #[test]
    fn valid_row_converts() {
        let (id, rec) = row(4.0, 1).into_record().unwrap();
        assert_eq!(id, BusinessId("b1".into()));
        assert!(rec.is_authentic());
    }

    #[test]
    fn rejects_out_of_range_stars() {
        assert!(row(6.0, 1).into_record().is_err());
    }

    #[test]
    fn rejects_string_style_labels() {
        let err = row(4.0, 2).into_record().unwrap_err();
        assert!(err.contains("0 or 1"));
    }

    #[test]
    fn blank_review_becomes_missing_text() {
        let mut r = row(3.0, 0);
        r.review = Some("   ".into());
        let (_, rec) = r.into_record().unwrap();
        assert!(rec.text.is_none());
    }
}
