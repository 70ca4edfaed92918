//! Ledger data model
//!
//! Address and transaction records as they are stored in the two address
//! partitions, plus the closed set of transaction categories.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Transaction category reported by the wallet backend
///
/// Parsed case-insensitively; stored and serialized in canonical camelCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Receive,
    SpendIn,
    Send,
    SpendOut,
    Mint,
    Mined,
}

impl Category {
    /// Partition the owning address belongs to, `None` for mints
    pub fn partition(self) -> Option<Partition> {
        match self {
            Self::Receive | Self::SpendIn | Self::Mined => Some(Partition::Wallet),
            Self::Send | Self::SpendOut => Some(Partition::ThirdParty),
            Self::Mint => None,
        }
    }

    /// Whether the transaction is visible on the public chain as a payment
    /// to the address (counts towards address reuse)
    pub fn is_public(self) -> bool {
        !matches!(self, Self::Mined | Self::SpendIn)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Receive => "receive",
            Self::SpendIn => "spendIn",
            Self::Send => "send",
            Self::SpendOut => "spendOut",
            Self::Mint => "mint",
            Self::Mined => "mined",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category string that does not name any known category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transaction category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "receive" => Ok(Self::Receive),
            "spendin" => Ok(Self::SpendIn),
            "send" => Ok(Self::Send),
            "spendout" => Ok(Self::SpendOut),
            "mint" => Ok(Self::Mint),
            "mined" => Ok(Self::Mined),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// The two disjoint address collections held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Partition {
    /// Addresses owned by this wallet
    Wallet,
    /// Addresses this wallet has paid to
    ThirdParty,
}

/// Block a transaction was confirmed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub hash: String,
    /// Block time in epoch milliseconds
    pub time: i64,
}

/// Fields shared by every transaction category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxBasics {
    /// Composite id: `{txid}-{index}`
    pub id: String,
    pub txid: String,
    pub index: u32,
    pub category: Category,
    pub amount: i64,
    /// Epoch milliseconds, never later than the block time when known
    pub first_seen_at: i64,
    pub block: Option<Block>,
    pub is_private: bool,
}

/// Composite transaction id for one output of a transaction
pub fn transaction_id(txid: &str, index: u32) -> String {
    format!("{}-{}", txid, index)
}

/// A transaction stored under an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub txid: String,
    pub index: u32,
    pub category: Category,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub first_seen_at: i64,
    pub block: Option<Block>,
    pub is_private: bool,
}

impl TransactionRecord {
    pub fn block_height(&self) -> Option<u64> {
        self.block.as_ref().map(|block| block.height)
    }
}

impl From<TxBasics> for TransactionRecord {
    fn from(basics: TxBasics) -> Self {
        Self {
            id: basics.id,
            txid: basics.txid,
            index: basics.index,
            category: basics.category,
            amount: basics.amount,
            fee: None,
            label: None,
            first_seen_at: basics.first_seen_at,
            block: basics.block,
            is_private: basics.is_private,
        }
    }
}

/// An address with its balance summary and transaction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub address: String,
    /// Balance summary as delivered by the backend with the first sighting
    pub total: Value,
    /// Transactions in order of their latest delivery
    pub transactions: Vec<TransactionRecord>,
}

impl AddressRecord {
    pub fn new(address: impl Into<String>, total: Value) -> Self {
        Self {
            address: address.into(),
            total,
            transactions: Vec::new(),
        }
    }

    /// `total.balance` when the summary carries one
    pub fn balance(&self) -> Option<i64> {
        self.total.get("balance").and_then(Value::as_i64)
    }
}
