//! Serde model of the parts of a CAMT.053 document that are read.
//! Repeating elements are sequences, so a single sibling and many siblings
//! deserialize the same way.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct Document {
    #[serde(rename = "BkToCstmrStmt")]
    pub bank_to_customer: Option<BankToCustomer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BankToCustomer {
    #[serde(rename = "GrpHdr")]
    pub group_header: Option<GroupHeader>,
    #[serde(rename = "Stmt", default)]
    pub statements: Vec<AccountStatement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupHeader {
    #[serde(rename = "CreDtTm")]
    pub created: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountStatement {
    #[serde(rename = "Acct")]
    pub account: Option<Account>,
    #[serde(rename = "Ntry", default)]
    pub entries: Vec<Entry>,
}

impl AccountStatement {
    /// The account's IBAN, if it has a non-blank one
    pub fn iban(&self) -> Option<&str> {
        self.account
            .as_ref()
            .and_then(|a| a.id.as_ref())
            .and_then(|id| id.iban.as_deref())
            .map(str::trim)
            .filter(|iban| !iban.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Account {
    #[serde(rename = "Id")]
    pub id: Option<AccountId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountId {
    #[serde(rename = "IBAN")]
    pub iban: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Entry {
    #[serde(rename = "Amt")]
    pub amount: Option<Amount>,
    #[serde(rename = "CdtDbtInd")]
    pub indicator: Option<String>,
    #[serde(rename = "BookgDt")]
    pub booking_date: Option<DateAndTime>,
    #[serde(rename = "ValDt")]
    pub value_date: Option<DateAndTime>,
    #[serde(rename = "AcctSvcrRef")]
    pub service_ref: Option<String>,
    #[serde(rename = "NtryDtls", default)]
    pub details: Vec<EntryDetails>,
    #[serde(rename = "AddtlNtryInf")]
    pub additional_info: Option<String>,
}

impl Entry {
    pub fn is_debit(&self) -> bool {
        self.indicator.as_deref().map(str::trim) == Some("DBIT")
    }

    /// The first transaction detail block, which carries the remittance and parties
    pub fn transaction(&self) -> Option<&TransactionDetails> {
        self.details.first().and_then(|d| d.transactions.first())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Amount {
    #[serde(rename = "$text", default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DateAndTime {
    #[serde(rename = "Dt")]
    pub date: Option<String>,
    #[serde(rename = "DtTm")]
    pub date_time: Option<String>,
}

impl DateAndTime {
    pub fn text(&self) -> Option<&str> {
        self.date
            .as_deref()
            .or(self.date_time.as_deref())
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntryDetails {
    #[serde(rename = "TxDtls", default)]
    pub transactions: Vec<TransactionDetails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionDetails {
    #[serde(rename = "RltdPties")]
    pub related_parties: Option<RelatedParties>,
    #[serde(rename = "RmtInf")]
    pub remittance: Option<RemittanceInfo>,
    #[serde(rename = "AddtlTxInf")]
    pub additional_info: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemittanceInfo {
    #[serde(rename = "Ustrd", default)]
    pub unstructured: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelatedParties {
    #[serde(rename = "Dbtr")]
    pub debtor: Option<Party>,
    #[serde(rename = "Cdtr")]
    pub creditor: Option<Party>,
}

/// A party is named directly (`Nm`) up to camt.053.001.07 and through `Pty/Nm` from .08 on.
#[derive(Debug, Deserialize)]
pub(crate) struct Party {
    #[serde(rename = "Nm")]
    pub name: Option<String>,
    #[serde(rename = "Pty")]
    pub party: Option<PartyName>,
}

impl Party {
    pub fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.party.as_ref().and_then(|p| p.name.as_deref()))
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PartyName {
    #[serde(rename = "Nm")]
    pub name: Option<String>,
}
