use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::authz::AuthzDecision;
use super::domain::{ActorId, Company, CompanyDraft, CompanyId};
use super::error::{PipelineError, StorageContext};
use super::identity::{Actor, Role};
use super::repository::{CompanyRepository, RepositoryError};
use super::validation::required;

/// Employer company profiles, one per owner.
pub struct CompanyRegistry<S> {
    store: Arc<S>,
}

impl<S> Clone for CompanyRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> CompanyRegistry<S>
where
    S: CompanyRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn register(&self, actor: &Actor, draft: CompanyDraft) -> Result<Company, PipelineError> {
        AuthzDecision::require_role(actor, Role::Employer).into_result()?;

        let name = required(&draft.name, "company name")?;
        let industry = required(&draft.industry, "industry")?;

        if self.find_by_owner(actor.id())?.is_some() {
            return Err(already_registered());
        }

        let company = Company {
            id: CompanyId::generate(),
            owner_id: actor.id().clone(),
            name,
            industry,
            description: draft.description,
            specialties: draft.specialties,
            service_areas: draft.service_areas,
            website: draft.website,
            created_at: Utc::now(),
        };

        let stored = match self.store.insert_company(company) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(already_registered()),
            Err(source) => {
                return Err(PipelineError::Storage {
                    operation: "register company",
                    source,
                })
            }
        };

        info!(company = %stored.id, owner = %stored.owner_id, "company registered");
        Ok(stored)
    }

    pub fn find_by_owner(&self, owner: &ActorId) -> Result<Option<Company>, PipelineError> {
        self.store
            .company_by_owner(owner)
            .during("find company by owner")
    }

    pub fn mine(&self, actor: &Actor) -> Result<Company, PipelineError> {
        self.find_by_owner(actor.id())?
            .ok_or_else(|| PipelineError::not_found("company for owner", actor.id()))
    }
}

fn already_registered() -> PipelineError {
    PipelineError::PreconditionFailed("company profile already exists".to_string())
}
