use crate::workflows::jobs::domain::parse_posted_on;
use crate::workflows::jobs::{JobId, JobRecord};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<JobRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<JobRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct JobRow {
    id: String,
    #[serde(default, alias = "jobTitle", deserialize_with = "empty_string_as_none")]
    job_title: Option<String>,
    #[serde(default, alias = "companyName", deserialize_with = "empty_string_as_none")]
    company_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default, alias = "jobType", deserialize_with = "empty_string_as_none")]
    job_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    experience: Option<String>,
    #[serde(default)]
    salary: Option<f64>,
    #[serde(
        default,
        alias = "postedOn",
        deserialize_with = "empty_string_as_none"
    )]
    posted_on: Option<String>,
}

impl JobRow {
    fn into_record(self) -> JobRecord {
        let id = match self.id.parse::<i64>() {
            Ok(numeric) => JobId::Numeric(numeric),
            Err(_) => JobId::Text(self.id),
        };

        JobRecord {
            id,
            job_title: self.job_title,
            company_name: self.company_name,
            location: self.location,
            job_type: self.job_type,
            experience: self.experience,
            salary: self.salary,
            posted_on: self.posted_on.as_deref().and_then(parse_posted_on),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    #[test]
    fn rows_map_empty_cells_to_absent_fields() {
        let csv = "id,job_title,company_name,location,job_type,experience,salary,posted_on\n\
1,Cloud Admin,IBM,\"New York, NY\",Remote,Entry Level,85000,2025-04-02\n\
abc-2,,SAP,,,,,\n";
        let records = parse_csv(Cursor::new(csv)).expect("csv parses");
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.id, JobId::Numeric(1));
        assert_eq!(first.location.as_deref(), Some("New York, NY"));
        assert_eq!(first.salary, Some(85_000.0));
        assert_eq!(first.posted_on, NaiveDate::from_ymd_opt(2025, 4, 2));

        let second = &records[1];
        assert_eq!(second.id, JobId::Text("abc-2".to_string()));
        assert!(second.job_title.is_none());
        assert!(second.salary.is_none());
        assert!(second.posted_on.is_none());
    }

    #[test]
    fn optional_columns_may_be_missing() {
        let csv = "id,jobTitle,companyName\n7,Cloud Dev,Intel\n";
        let records = parse_csv(Cursor::new(csv)).expect("csv parses");
        assert_eq!(records[0].job_title.as_deref(), Some("Cloud Dev"));
        assert!(records[0].job_type.is_none());
    }

    #[test]
    fn malformed_salary_is_an_error() {
        let csv = "id,salary\n1,lots\n";
        assert!(parse_csv(Cursor::new(csv)).is_err());
    }
}
