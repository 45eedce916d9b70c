use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::amounts::{checked_sum, line_gross, percent_of};
use super::types::*;

/// Builder for constructing document records.
///
/// When no explicit [`DocumentTotals`] are supplied, the monetary totals are
/// derived from the line items and the document-level charges.
///
/// ```
/// use nota::core::*;
/// use rust_decimal_macros::dec;
///
/// let record = DocumentBuilder::new(
///     DocumentCategory::Invoice,
///     "35240611222333000181550010000012341000056786",
///     PartyBuilder::new("11222333000181", "ACME Comercio Ltda", "SP").build(),
/// )
/// .number(1234)
/// .add_item(
///     LineItemBuilder::new(1, "P-001", dec!(10), dec!(15.50))
///         .classification("07032090")
///         .operation("5102")
///         .icms(dec!(155.00), dec!(18))
///         .build(),
/// )
/// .build();
///
/// assert_eq!(record.totals.products, dec!(155.00));
/// assert_eq!(record.totals.icms, dec!(27.90));
/// assert_eq!(record.totals.document_total, dec!(155.00));
/// ```
pub struct DocumentBuilder {
    category: DocumentCategory,
    access_key: String,
    number: u64,
    series: u32,
    issue_date: Option<NaiveDate>,
    direction: Direction,
    purpose: OperationPurpose,
    issuer: Party,
    recipient: Option<Party>,
    tax_regime: Option<TaxRegime>,
    totals: Option<DocumentTotals>,
    discount: Decimal,
    freight: Decimal,
    insurance: Decimal,
    other: Decimal,
    service: Option<(Decimal, Decimal)>,
    service_icms: Option<TaxTriple>,
    items: Vec<LineItem>,
    transport: Option<TransportInfo>,
}

impl DocumentBuilder {
    pub fn new(category: DocumentCategory, access_key: impl Into<String>, issuer: Party) -> Self {
        Self {
            category,
            access_key: access_key.into(),
            number: 1,
            series: 1,
            issue_date: None,
            direction: Direction::Exit,
            purpose: OperationPurpose::Sale,
            issuer,
            recipient: None,
            tax_regime: None,
            totals: None,
            discount: Decimal::ZERO,
            freight: Decimal::ZERO,
            insurance: Decimal::ZERO,
            other: Decimal::ZERO,
            service: None,
            service_icms: None,
            items: Vec::new(),
            transport: None,
        }
    }

    pub fn number(mut self, number: u64) -> Self {
        self.number = number;
        self
    }

    pub fn series(mut self, series: u32) -> Self {
        self.series = series;
        self
    }

    pub fn issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = Some(date);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn purpose(mut self, purpose: OperationPurpose) -> Self {
        self.purpose = purpose;
        self
    }

    pub fn recipient(mut self, party: Party) -> Self {
        self.recipient = Some(party);
        self
    }

    pub fn tax_regime(mut self, regime: TaxRegime) -> Self {
        self.tax_regime = Some(regime);
        self
    }

    /// Use the given totals verbatim instead of deriving them.
    pub fn totals(mut self, totals: DocumentTotals) -> Self {
        self.totals = Some(totals);
        self
    }

    /// Document-level discount, on top of any item discounts.
    pub fn discount(mut self, amount: Decimal) -> Self {
        self.discount = amount;
        self
    }

    pub fn freight(mut self, amount: Decimal) -> Self {
        self.freight = amount;
        self
    }

    pub fn insurance(mut self, amount: Decimal) -> Self {
        self.insurance = amount;
        self
    }

    pub fn other_charges(mut self, amount: Decimal) -> Self {
        self.other = amount;
        self
    }

    /// Total service value and amount receivable of a transport service.
    pub fn service_totals(mut self, total: Decimal, receivable: Decimal) -> Self {
        self.service = Some((total, receivable));
        self
    }

    /// ICMS on a transport service; the value is computed from base and rate.
    pub fn service_icms(mut self, base: Decimal, rate: Decimal) -> Self {
        self.service_icms = Some(tax(base, rate));
        self
    }

    pub fn add_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn transport(mut self, transport: TransportInfo) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> DocumentRecord {
        let totals = match self.totals {
            Some(totals) => totals,
            None => {
                let mut totals = DocumentTotals {
                    discount: self.discount,
                    freight: self.freight,
                    insurance: self.insurance,
                    other: self.other,
                    service_total: self.service.map(|(total, _)| total),
                    receivable: self.service.map(|(_, receivable)| receivable),
                    service_icms: self.service_icms,
                    ..Default::default()
                };
                sum_items(&mut totals, &self.items);
                totals
            }
        };

        DocumentRecord {
            category: self.category,
            access_key: self.access_key,
            number: self.number,
            series: self.series,
            issue_date: self.issue_date,
            direction: self.direction,
            purpose: self.purpose,
            issuer: self.issuer,
            recipient: self.recipient,
            tax_regime: self.tax_regime,
            totals,
            items: self.items,
            transport: self.transport,
        }
    }
}

/// Fill the item-derived totals and the document total.
///
/// A sum that overflows is left at zero; validation then reports the total
/// as out of range.
fn sum_items(totals: &mut DocumentTotals, items: &[LineItem]) {
    totals.products = sum_of(items, |i| i.gross_total);
    totals.icms_base = sum_of(items, |i| i.icms.map_or(Decimal::ZERO, |t| t.base));
    totals.icms = sum_of(items, |i| tax_value(i.icms));
    totals.ipi = sum_of(items, |i| tax_value(i.ipi));
    totals.pis = sum_of(items, |i| tax_value(i.pis));
    totals.cofins = sum_of(items, |i| tax_value(i.cofins));
    totals.document_total = totals.composed_total().unwrap_or_default();
}

fn sum_of(items: &[LineItem], amount: fn(&LineItem) -> Decimal) -> Decimal {
    checked_sum(items.iter().map(amount)).unwrap_or_default()
}

fn tax_value(triple: Option<TaxTriple>) -> Decimal {
    triple.map_or(Decimal::ZERO, |t| t.value)
}

fn tax(base: Decimal, rate: Decimal) -> TaxTriple {
    TaxTriple::new(base, rate, percent_of(base, rate).unwrap_or_default())
}

/// Builder for Party (issuer/recipient).
pub struct PartyBuilder {
    tax_id: String,
    name: String,
    jurisdiction: String,
    state_registration: Option<String>,
    postal_code: Option<String>,
    municipality: Option<String>,
}

impl PartyBuilder {
    pub fn new(
        tax_id: impl Into<String>,
        name: impl Into<String>,
        jurisdiction: impl Into<String>,
    ) -> Self {
        Self {
            tax_id: tax_id.into(),
            name: name.into(),
            jurisdiction: jurisdiction.into(),
            state_registration: None,
            postal_code: None,
            municipality: None,
        }
    }

    pub fn state_registration(mut self, ie: impl Into<String>) -> Self {
        self.state_registration = Some(ie.into());
        self
    }

    pub fn postal_code(mut self, cep: impl Into<String>) -> Self {
        self.postal_code = Some(cep.into());
        self
    }

    pub fn municipality(mut self, name: impl Into<String>) -> Self {
        self.municipality = Some(name.into());
        self
    }

    pub fn build(self) -> Party {
        Party {
            tax_id: self.tax_id,
            name: self.name,
            state_registration: self.state_registration,
            jurisdiction: self.jurisdiction,
            postal_code: self.postal_code,
            municipality: self.municipality,
        }
    }
}

/// Builder for LineItem.
///
/// The gross total defaults to `quantity × unit_price − discount`, rounded to
/// cents; tax values default to `base × rate / 100`.
pub struct LineItemBuilder {
    number: u32,
    product_code: String,
    classification_code: String,
    operation_code: String,
    tax_situation: String,
    quantity: Decimal,
    unit_price: Decimal,
    discount: Decimal,
    gross_total: Option<Decimal>,
    icms: Option<TaxTriple>,
    ipi: Option<TaxTriple>,
    pis: Option<TaxTriple>,
    cofins: Option<TaxTriple>,
}

impl LineItemBuilder {
    pub fn new(
        number: u32,
        product_code: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            number,
            product_code: product_code.into(),
            classification_code: String::new(),
            operation_code: String::new(),
            tax_situation: "00".to_string(),
            quantity,
            unit_price,
            discount: Decimal::ZERO,
            gross_total: None,
            icms: None,
            ipi: None,
            pis: None,
            cofins: None,
        }
    }

    pub fn classification(mut self, ncm: impl Into<String>) -> Self {
        self.classification_code = ncm.into();
        self
    }

    pub fn operation(mut self, cfop: impl Into<String>) -> Self {
        self.operation_code = cfop.into();
        self
    }

    pub fn situation(mut self, code: impl Into<String>) -> Self {
        self.tax_situation = code.into();
        self
    }

    pub fn discount(mut self, amount: Decimal) -> Self {
        self.discount = amount;
        self
    }

    /// Override the declared gross total.
    pub fn gross_total(mut self, amount: Decimal) -> Self {
        self.gross_total = Some(amount);
        self
    }

    pub fn icms(mut self, base: Decimal, rate: Decimal) -> Self {
        self.icms = Some(tax(base, rate));
        self
    }

    /// Set the ICMS triple verbatim, including a possibly inconsistent value.
    pub fn icms_triple(mut self, triple: TaxTriple) -> Self {
        self.icms = Some(triple);
        self
    }

    pub fn ipi(mut self, base: Decimal, rate: Decimal) -> Self {
        self.ipi = Some(tax(base, rate));
        self
    }

    pub fn pis(mut self, base: Decimal, rate: Decimal) -> Self {
        self.pis = Some(tax(base, rate));
        self
    }

    pub fn cofins(mut self, base: Decimal, rate: Decimal) -> Self {
        self.cofins = Some(tax(base, rate));
        self
    }

    pub fn build(self) -> LineItem {
        let gross_total = self.gross_total.unwrap_or_else(|| {
            line_gross(self.quantity, self.unit_price, self.discount).unwrap_or_default()
        });
        LineItem {
            number: self.number,
            product_code: self.product_code,
            classification_code: self.classification_code,
            operation_code: self.operation_code,
            tax_situation: self.tax_situation,
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount: self.discount,
            gross_total,
            icms: self.icms,
            ipi: self.ipi,
            pis: self.pis,
            cofins: self.cofins,
        }
    }
}

/// Builder for TransportInfo.
pub struct TransportBuilder {
    info: TransportInfo,
}

impl TransportBuilder {
    pub fn new(modal: impl Into<String>) -> Self {
        Self {
            info: TransportInfo {
                modal: Some(modal.into()),
                ..Default::default()
            },
        }
    }

    pub fn carrier_registration(mut self, rntrc: impl Into<String>) -> Self {
        self.info.carrier_registration = Some(rntrc.into());
        self
    }

    pub fn vehicle_plate(mut self, plate: impl Into<String>) -> Self {
        self.info.vehicle_plate = Some(plate.into());
        self
    }

    /// Jurisdictions crossed, in order.
    pub fn route<I, S>(mut self, route: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.info.route = route.into_iter().map(Into::into).collect();
        self
    }

    pub fn origin(mut self, uf: impl Into<String>) -> Self {
        self.info.origin = Some(uf.into());
        self
    }

    pub fn destination(mut self, uf: impl Into<String>) -> Self {
        self.info.destination = Some(uf.into());
        self
    }

    pub fn cargo_weight(mut self, kg: Decimal) -> Self {
        self.info.cargo_weight = Some(kg);
        self
    }

    /// Mark the load as dangerous, optionally with the dangerous-goods quantity.
    pub fn dangerous(mut self, quantity: Option<Decimal>) -> Self {
        self.info.dangerous_cargo = true;
        self.info.dangerous_goods_quantity = quantity;
        self
    }

    pub fn build(self) -> TransportInfo {
        self.info
    }
}
