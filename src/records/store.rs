use crate::error::Error;
use crate::records::dataset::Dataset;
use std::sync::Arc;

/// fixed schema of the Windows security event table the store serves
pub const EVENT_FIELDS: &[&str] = &[
    "eventrecordid",
    "eventid",
    "systemtime",
    "subjectusersid",
    "subjectusername",
    "subjectdomainname",
    "subjectlogonid",
    "privilegelist",
    "targetusersid",
    "targetusername",
    "targetdomainname",
    "targetlogonid",
    "targetlogonguid",
    "targetservername",
    "targetinfo",
    "logontype",
    "logonprocessname",
    "authenticationpackagename",
    "workstationname",
    "logonguid",
    "transmittedservices",
    "processname",
    "ipaddress",
    "ipport",
    "impersonationlevel",
    "restrictedadminmode",
    "targetoutboundusername",
    "targetoutbounddomainname",
    "targetlinkedlogonid",
    "elevatedtoken",
    "keywords",
    "opcode",
    "provider_guid",
    "security_userid",
    "task",
    "version",
    "host",
    "computertype",
    "status",
    "substatus",
    "failurereason",
    "virtualaccount",
    "lmpackagename",
];

/// standard meta-field groupings over the event schema
pub const SUBJECT_USER: &[&str] = &["subjectusersid", "subjectusername", "subjectdomainname"];
pub const TARGET_USER: &[&str] = &["targetusersid", "targetusername", "targetdomainname"];
pub const TARGET_AUTHENT: &[&str] = &["targetservername", "targetinfo"];
pub const FAILURE: &[&str] = &["failurereason", "status", "substatus"];
pub const AUTH_METHOD: &[&str] = &["authenticationpackagename", "lmpackagename"];
pub const TARGET_OUTBOUND: &[&str] = &["targetoutboundusername", "targetoutbounddomainname"];

/// connection to the authentication log store. Columns come back as text
/// and run through the same discretization path as file ingestion; only
/// the post-discretization `Records` interface ever touches the core.
pub struct Store(Arc<tokio_postgres::Client>);

impl Store {
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let (client, connection) = tokio_postgres::connect(url, tokio_postgres::NoTls).await?;
        tokio::spawn(connection);
        Ok(Self(Arc::new(client)))
    }

    /// pull the named columns of one event table, optionally filtered,
    /// as a raw categorical dataset. NULLs discretize to "?".
    pub async fn dataset(
        &self,
        table: &str,
        columns: &[&str],
        filter: Option<&str>,
    ) -> Result<Dataset, Error> {
        for column in columns {
            if !EVENT_FIELDS.contains(column) {
                return Err(Error::Query(format!("unknown event field {}", column)));
            }
        }
        let select = columns
            .iter()
            .map(|c| format!("{}::TEXT", c))
            .collect::<Vec<_>>()
            .join(", ");
        let command = match filter {
            Some(clause) => format!("SELECT {} FROM {} WHERE {}", select, table, clause),
            None => format!("SELECT {} FROM {}", select, table),
        };
        log::info!("{:<32}{:<32}", "querying store", table);
        let rows = self.0.query(&command, &[]).await?;
        let names = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| {
                (0..columns.len())
                    .map(|i| row.get::<_, Option<String>>(i).unwrap_or_else(|| "?".into()))
                    .collect()
            })
            .collect();
        Dataset::assemble(names, rows)
    }
}
