use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// A normalized fiscal document as handed over by the document producer.
///
/// The engine never mutates a record; it is borrowed for the duration of a
/// validation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Document family, which drives rule applicability.
    pub category: DocumentCategory,
    /// 44-digit access key (chave de acesso).
    pub access_key: String,
    /// Document number (nNF / nCT / nMDF).
    pub number: u64,
    /// Document series.
    pub series: u32,
    /// Issue date (dhEmi, date part).
    pub issue_date: Option<NaiveDate>,
    /// Entry or exit document (tpNF).
    pub direction: Direction,
    /// Declared nature of the operation.
    pub purpose: OperationPurpose,
    /// Issuing party (emitente).
    pub issuer: Party,
    /// Receiving party (destinatário). Absent on consumer receipts and manifests.
    pub recipient: Option<Party>,
    /// Issuer tax regime (CRT). Absent on documents that do not carry it.
    pub tax_regime: Option<TaxRegime>,
    /// Document-level monetary totals.
    pub totals: DocumentTotals,
    /// Line items, in document order. Empty for transport documents.
    pub items: Vec<LineItem>,
    /// Transport attributes (CT-e / MDF-e).
    pub transport: Option<TransportInfo>,
}

/// Document family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    /// NF-e (model 55) or NFC-e (model 65).
    Invoice,
    /// CT-e (model 57).
    TransportService,
    /// MDF-e (model 58).
    TransportManifest,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 3] = [
        Self::Invoice,
        Self::TransportService,
        Self::TransportManifest,
    ];

    /// Resolve a category from the two-digit model code embedded in the access key.
    pub fn from_model(model: &str) -> Result<Self, EngineError> {
        match model {
            "55" | "65" => Ok(Self::Invoice),
            "57" | "67" => Ok(Self::TransportService),
            "58" => Ok(Self::TransportManifest),
            other => Err(EngineError::UnknownCategory(other.to_string())),
        }
    }

    /// Model codes a document of this category may carry.
    pub fn models(self) -> &'static [&'static str] {
        match self {
            Self::Invoice => &["55", "65"],
            Self::TransportService => &["57", "67"],
            Self::TransportManifest => &["58"],
        }
    }

    pub fn is_transport(self) -> bool {
        matches!(self, Self::TransportService | Self::TransportManifest)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::TransportService => "transport_service",
            Self::TransportManifest => "transport_manifest",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentCategory {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invoice" | "nfe" | "nf-e" | "nfce" | "nfc-e" => Ok(Self::Invoice),
            "transport_service" | "cte" | "ct-e" => Ok(Self::TransportService),
            "transport_manifest" | "mdfe" | "mdf-e" => Ok(Self::TransportManifest),
            _ => Err(EngineError::UnknownCategory(s.to_string())),
        }
    }
}

/// Movement direction declared by the document (tpNF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Entry,
    Exit,
}

/// Declared nature of the operation (natOp, normalized).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationPurpose {
    Purchase,
    Sale,
    Transfer,
    Return,
    /// Anything the producer could not classify; unconstrained.
    Other,
}

impl fmt::Display for OperationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
            Self::Transfer => "transfer",
            Self::Return => "return",
            Self::Other => "other",
        })
    }
}

/// Issuer tax regime (CRT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// CRT 1: Simples Nacional.
    Simplified,
    /// CRT 2: Simples Nacional, gross revenue above the sub-limit.
    SimplifiedExcess,
    /// CRT 3: regime normal.
    Normal,
}

impl TaxRegime {
    pub fn is_simplified(self) -> bool {
        matches!(self, Self::Simplified | Self::SimplifiedExcess)
    }

    /// Map the numeric CRT code.
    pub fn from_crt(crt: u8) -> Option<Self> {
        match crt {
            1 => Some(Self::Simplified),
            2 => Some(Self::SimplifiedExcess),
            3 => Some(Self::Normal),
            _ => None,
        }
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Simplified => "simplified",
            Self::SimplifiedExcess => "simplified (excess revenue)",
            Self::Normal => "normal",
        })
    }
}

/// Issuer or recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    /// CNPJ (14 digits) or, for recipients, CPF (11 digits).
    pub tax_id: String,
    /// Registered name (razão social).
    pub name: String,
    /// State registration (inscrição estadual), or `ISENTO`.
    pub state_registration: Option<String>,
    /// Two-letter jurisdiction code (UF), or `EX` for foreign parties.
    pub jurisdiction: String,
    /// Postal code (CEP), 8 digits.
    pub postal_code: Option<String>,
    /// Municipality name as declared.
    pub municipality: Option<String>,
}

/// Document-level totals (ICMSTot / vPrest).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// vProd: sum of item gross values.
    pub products: Decimal,
    /// vDesc.
    pub discount: Decimal,
    /// vFrete.
    pub freight: Decimal,
    /// vSeg.
    pub insurance: Decimal,
    /// vOutro.
    pub other: Decimal,
    /// vBC: ICMS tax base.
    pub icms_base: Decimal,
    /// vICMS.
    pub icms: Decimal,
    /// vIPI.
    pub ipi: Decimal,
    /// vPIS.
    pub pis: Decimal,
    /// vCOFINS.
    pub cofins: Decimal,
    /// vNF: document total.
    pub document_total: Decimal,
    /// vTPrest: total service value (CT-e).
    pub service_total: Option<Decimal>,
    /// vRec: amount receivable (CT-e).
    pub receivable: Option<Decimal>,
    /// ICMS levied on the transport service (CT-e).
    pub service_icms: Option<TaxTriple>,
}

/// One invoice line (det).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// nItem, 1-based.
    pub number: u32,
    /// cProd.
    pub product_code: String,
    /// NCM, 8 digits.
    pub classification_code: String,
    /// CFOP, 4 digits.
    pub operation_code: String,
    /// CST (2 digits, normal regime) or CSOSN (3 digits, simplified regime).
    pub tax_situation: String,
    /// qCom.
    pub quantity: Decimal,
    /// vUnCom.
    pub unit_price: Decimal,
    /// vDesc.
    pub discount: Decimal,
    /// vProd: declared gross total.
    pub gross_total: Decimal,
    pub icms: Option<TaxTriple>,
    pub ipi: Option<TaxTriple>,
    pub pis: Option<TaxTriple>,
    pub cofins: Option<TaxTriple>,
}

/// Base, rate (percent) and value of one tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxTriple {
    pub base: Decimal,
    pub rate: Decimal,
    pub value: Decimal,
}

impl TaxTriple {
    pub fn new(base: Decimal, rate: Decimal, value: Decimal) -> Self {
        Self { base, rate, value }
    }
}

/// Transport attributes carried by CT-e and MDF-e documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportInfo {
    /// Modal code: 01 road, 02 air, 03 waterway, 04 rail, 05 pipeline, 06 multimodal.
    pub modal: Option<String>,
    /// Carrier registration (RNTRC), 8 digits.
    pub carrier_registration: Option<String>,
    /// Traction vehicle plate.
    pub vehicle_plate: Option<String>,
    /// Jurisdictions crossed, in order (UFPer plus endpoints).
    pub route: Vec<String>,
    /// Loading jurisdiction.
    pub origin: Option<String>,
    /// Unloading jurisdiction.
    pub destination: Option<String>,
    /// Gross cargo weight in kg.
    pub cargo_weight: Option<Decimal>,
    /// Whether the load contains dangerous goods.
    pub dangerous_cargo: bool,
    /// Quantity of dangerous goods in kg.
    pub dangerous_goods_quantity: Option<Decimal>,
}
