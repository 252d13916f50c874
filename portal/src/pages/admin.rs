//! Airport operations dashboard (staff and admin).
//!
//! Every mutation refetches the list it touched so the table reflects the
//! backend rather than a local guess.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use super::{ActionOutcome, PageStatus};
use crate::net::api::ApiClient;
use crate::net::error::ClientError;
use crate::net::types::{
    BaggageDetail, BaggageStatus, CreateBaggageRequest, CreateGateRequest, Gate, GateStatus,
    UpdateBaggageRequest,
};
use crate::routes::ViewHandle;

/// Raw gate form input. `terminal_id` is text as typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateForm {
    pub terminal_id: String,
    pub code: String,
    pub status: GateStatus,
}

impl Default for GateForm {
    fn default() -> Self {
        Self {
            terminal_id: String::new(),
            code: String::new(),
            status: GateStatus::Open,
        }
    }
}

impl GateForm {
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] naming the first bad field.
    pub fn validate(&self) -> Result<CreateGateRequest, ClientError> {
        let terminal_id = self.terminal_id.trim();
        if terminal_id.is_empty() {
            return Err(ClientError::validation("terminal_id", "Terminal ID is required"));
        }
        let terminal_id = terminal_id
            .parse::<i64>()
            .map_err(|_| ClientError::validation("terminal_id", "Terminal ID must be a number"))?;
        let code = self.code.trim();
        if code.is_empty() {
            return Err(ClientError::validation("code", "Gate code is required"));
        }
        if self.status == GateStatus::Unknown {
            return Err(ClientError::validation("status", "Choose OPEN, CLOSED or MAINTENANCE"));
        }
        Ok(CreateGateRequest {
            terminal_id,
            code: code.to_owned(),
            status: self.status,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct AdminPage {
    pub gates: Vec<Gate>,
    pub baggage: Vec<BaggageDetail>,
    pub status: PageStatus,
}

impl AdminPage {
    /// Fetch gates and all baggage.
    ///
    /// # Errors
    ///
    /// The first request failure.
    pub async fn load(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
    ) -> Result<ActionOutcome, ClientError> {
        if self.reload_gates(api, view).await? == ActionOutcome::Discarded {
            return Ok(ActionOutcome::Discarded);
        }
        self.reload_baggage(api, view).await
    }

    /// # Errors
    ///
    /// Request failures.
    pub async fn reload_gates(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
    ) -> Result<ActionOutcome, ClientError> {
        self.status.begin();
        let result = api.list_gates().await;
        let Some(gates) = self.status.settle(view, result)? else {
            return Ok(ActionOutcome::Discarded);
        };
        self.gates = gates;
        Ok(ActionOutcome::Applied)
    }

    /// # Errors
    ///
    /// Request failures.
    pub async fn reload_baggage(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
    ) -> Result<ActionOutcome, ClientError> {
        self.status.begin();
        let result = api.list_all_baggage().await;
        let Some(baggage) = self.status.settle(view, result)? else {
            return Ok(ActionOutcome::Discarded);
        };
        self.baggage = baggage;
        Ok(ActionOutcome::Applied)
    }

    /// Create a gate, then refetch gates.
    ///
    /// # Errors
    ///
    /// Validation or request failures.
    pub async fn create_gate(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
        form: &GateForm,
    ) -> Result<ActionOutcome, ClientError> {
        let req = form.validate().map_err(|e| self.status.reject(e))?;
        self.status.begin();
        let result = api.create_gate(&req).await;
        let Some(gate) = self.status.settle(view, result)? else {
            return Ok(ActionOutcome::Discarded);
        };
        tracing::info!(gate_id = gate.id, code = %gate.code, "gate created");
        self.status.notice = Some("Gate created successfully".into());
        self.reload_gates(api, view).await
    }

    /// Check in baggage for a ticket, then refetch baggage.
    ///
    /// # Errors
    ///
    /// Request failures.
    pub async fn check_in(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
        ticket_id: i64,
    ) -> Result<ActionOutcome, ClientError> {
        self.status.begin();
        let result = api.check_in_baggage(&CreateBaggageRequest { ticket_id }).await;
        let Some(bag) = self.status.settle(view, result)? else {
            return Ok(ActionOutcome::Discarded);
        };
        tracing::info!(baggage_id = bag.id, tag = %bag.tag_code, "baggage checked in");
        self.status.notice = Some(format!("Baggage {} checked in", bag.tag_code));
        self.reload_baggage(api, view).await
    }

    /// Move a bag one step along RECEIVED → LOADED → IN_TRANSIT → DELIVERED.
    ///
    /// Delivered bags are left alone without a request.
    ///
    /// # Errors
    ///
    /// Validation failure for unknown bags or statuses; request failures.
    pub async fn advance_baggage(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
        baggage_id: i64,
    ) -> Result<ActionOutcome, ClientError> {
        let listed = self.baggage.iter().find(|b| b.id == baggage_id);
        let Some(current) = listed.map(|b| b.status) else {
            let message = format!("Baggage {baggage_id} is not listed");
            return Err(self.status.reject(ClientError::validation("baggage", message)));
        };
        let Some(next) = current.next() else {
            return Err(self
                .status
                .reject(ClientError::validation("status", "Baggage status is not recognized")));
        };
        if next == current {
            self.status.notice = Some("Baggage already delivered".into());
            return Ok(ActionOutcome::Applied);
        }
        self.set_baggage_status(api, view, baggage_id, next).await
    }

    /// Set a bag's status explicitly, then refetch baggage.
    ///
    /// # Errors
    ///
    /// Request failures.
    pub async fn set_baggage_status(
        &mut self,
        api: &ApiClient,
        view: &ViewHandle,
        baggage_id: i64,
        status: BaggageStatus,
    ) -> Result<ActionOutcome, ClientError> {
        self.status.begin();
        let result = api.update_baggage(baggage_id, &UpdateBaggageRequest { status }).await;
        if self.status.settle(view, result)?.is_none() {
            return Ok(ActionOutcome::Discarded);
        }
        tracing::info!(baggage_id, ?status, "baggage status updated");
        self.status.notice = Some("Baggage status updated".into());
        self.reload_baggage(api, view).await
    }
}
