// 📨 Dispatcher - named-function invocations with string arguments
//
// The host delivers `(function, [arg, ...])`; the dispatcher checks arity,
// parses numbers, and calls into the Registry. Results are byte payloads
// (JSON for reads, empty for creates).

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::entities::{Account, CommercialPaper, Customer, EntityKind, Owner, Regulator, Vendor};
use crate::error::{CusipError, RegistryError};
use crate::registry::Registry;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Received unknown function invocation: {0}")]
    UnknownFunction(String),

    #[error("{function}: {reason}")]
    BadArguments { function: String, reason: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Cusip(#[from] CusipError),
}

/// Function names accepted by `invoke`
pub const FUNCTIONS: [&str; 10] = [
    "createVendor",
    "getVendor",
    "createAccount",
    "getAccount",
    "createCustomer",
    "getCustomer",
    "createRegulator",
    "getRegulator",
    "issueCommercialPaper",
    "getCP",
];

/// Instrument as submitted for issue: no CUSIP yet, owners optional
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRequest {
    pub ticker: String,
    pub par: f64,
    pub qty: i64,
    pub discount: f64,
    pub maturity: i64,
    #[serde(default)]
    pub owner: Vec<Owner>,
    pub issuer: String,
    #[serde(rename = "issueDate")]
    pub issue_date: String,
}

// ============================================================================
// ARGUMENT HELPERS
// ============================================================================

fn bad_args(function: &str, reason: impl Into<String>) -> DispatchError {
    DispatchError::BadArguments {
        function: function.to_string(),
        reason: reason.into(),
    }
}

fn expect_args<'a>(
    function: &str,
    args: &'a [String],
    names: &[&str],
) -> Result<&'a [String], DispatchError> {
    if args.len() != names.len() {
        return Err(bad_args(
            function,
            format!(
                "expected {} argument(s) ({}), got {}",
                names.len(),
                names.join(", "),
                args.len()
            ),
        ));
    }
    Ok(args)
}

fn parse_int(function: &str, name: &str, value: &str) -> Result<i64, DispatchError> {
    value
        .parse()
        .map_err(|_| bad_args(function, format!("{} must be an integer, got '{}'", name, value)))
}

/// NaN and infinities are rejected: JSON has no encoding for them.
fn parse_float(function: &str, name: &str, value: &str) -> Result<f64, DispatchError> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| bad_args(function, format!("{} must be a number, got '{}'", name, value)))?;
    if !parsed.is_finite() {
        return Err(bad_args(
            function,
            format!("{} must be a finite number, got '{}'", name, value),
        ));
    }
    Ok(parsed)
}

// ============================================================================
// DISPATCHER
// ============================================================================

pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Dispatcher { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run one invocation. Each call is independent; a failure leaves no
    /// state behind for the next one.
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>, DispatchError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("invoke", %request_id, function, argc = args.len());
        let _enter = span.enter();

        let result = self.route(function, args);
        match &result {
            Ok(payload) => info!(bytes = payload.len(), "invocation succeeded"),
            Err(e) => warn!(error = %e, "invocation failed"),
        }
        result
    }

    fn route(&self, function: &str, args: &[String]) -> Result<Vec<u8>, DispatchError> {
        match function {
            "createVendor" => {
                let a = expect_args(function, args, &["id", "name", "type", "pointsQuantity"])?;
                let points = parse_int(function, "pointsQuantity", &a[3])?;
                self.registry
                    .create_record(&Vendor::new(&a[0], &a[1], &a[2], points))?;
                Ok(Vec::new())
            }
            "createAccount" => {
                let a = expect_args(function, args, &["id", "prefix", "cashBalance"])?;
                let cash = parse_float(function, "cashBalance", &a[2])?;
                self.registry
                    .create_record(&Account::new(&a[0], &a[1], cash))?;
                Ok(Vec::new())
            }
            "createCustomer" => {
                let a = expect_args(function, args, &["id", "mobile", "points"])?;
                let points = parse_int(function, "points", &a[2])?;
                self.registry
                    .create_record(&Customer::new(&a[0], &a[1], points))?;
                Ok(Vec::new())
            }
            "createRegulator" => {
                let a = expect_args(function, args, &["id", "currencyName", "points", "quantity"])?;
                let quantity = parse_int(function, "quantity", &a[3])?;
                self.registry
                    .create_record(&Regulator::new(&a[0], &a[1], &a[2], quantity))?;
                Ok(Vec::new())
            }
            "issueCommercialPaper" => {
                let a = expect_args(function, args, &["paper"])?;
                let request: IssueRequest = serde_json::from_str(&a[0])
                    .map_err(|e| bad_args(function, format!("invalid paper JSON: {}", e)))?;
                let cusip = self.issue_commercial_paper(request)?;
                Ok(cusip.into_bytes())
            }
            "getVendor" => self.get_bytes(function, args, EntityKind::Vendor),
            "getAccount" => self.get_bytes(function, args, EntityKind::Account),
            "getCustomer" => self.get_bytes(function, args, EntityKind::Customer),
            "getRegulator" => self.get_bytes(function, args, EntityKind::Regulator),
            "getCP" => self.get_bytes(function, args, EntityKind::CommercialPaper),
            other => Err(DispatchError::UnknownFunction(other.to_string())),
        }
    }

    fn get_bytes(
        &self,
        function: &str,
        args: &[String],
        kind: EntityKind,
    ) -> Result<Vec<u8>, DispatchError> {
        let a = expect_args(function, args, &["id"])?;
        let entity = self.registry.read(kind, &a[0])?;
        let bytes = entity.to_bytes().map_err(|e| RegistryError::Encode {
            kind,
            id: a[0].clone(),
            reason: e.to_string(),
        })?;
        Ok(bytes)
    }

    /// Stamp a new instrument with its CUSIP and create it
    ///
    /// CUSIP = issuer account's prefix + maturity suffix. The issuer must
    /// already exist. Returns the CUSIP.
    pub fn issue_commercial_paper(&self, request: IssueRequest) -> Result<String, DispatchError> {
        let issuer: Account = self.registry.read_record(&request.issuer)?;

        let mut paper = CommercialPaper {
            cusip: String::new(),
            ticker: request.ticker,
            par: request.par,
            quantity: request.qty,
            discount: request.discount,
            maturity: request.maturity,
            owners: request.owner,
            issuer: request.issuer,
            issue_date: request.issue_date,
        };
        paper.stamp_cusip(&issuer.prefix)?;
        paper.default_owner_to_issuer();

        self.registry.create_record(&paper)?;
        info!(cusip = %paper.cusip, issuer = %paper.issuer, "commercial paper issued");
        Ok(paper.cusip)
    }
}

// ============================================================================
// TESTS
// ============================================================================
