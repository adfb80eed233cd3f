//! Transient record store kept entirely in process memory.
//!
//! # Responsibility
//! - Serve tests and ephemeral deployments with the same contract as the
//!   SQLite store.
//!
//! # Invariants
//! - Each collection owns its id counter; assignment and insertion happen
//!   under the same lock, so concurrent creates never share an id.
//! - Username uniqueness is checked under the users lock and reported as
//!   `RepoError::DuplicateUsername`, matching the SQLite `UNIQUE` constraint.
//! - All data is lost when the store is dropped.

use super::{RecordStore, RepoError, RepoResult};
use crate::model::inquiry::{Inquiry, NewInquiry};
use crate::model::registration::{NewRegistrationAssistance, RegistrationAssistance};
use crate::model::service_request::{NewServiceRequest, ServiceRequest};
use crate::model::user::{NewUser, User};
use crate::model::{created_now, RecordId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

struct Collection<T> {
    name: &'static str,
    next_id: RecordId,
    rows: BTreeMap<RecordId, T>,
}

impl<T: Clone> Collection<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(RecordId) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let record = build(id);
        self.rows.insert(id, record.clone());
        record
    }

    fn get(&self, id: RecordId) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn newest_first(&self, key: impl Fn(&T) -> (DateTime<Utc>, RecordId)) -> Vec<T> {
        let mut records = self.rows.values().cloned().collect::<Vec<_>>();
        records.sort_by(|left, right| key(right).cmp(&key(left)));
        records
    }
}

/// In-memory record store.
pub struct MemoryRecordStore {
    users: Mutex<Collection<User>>,
    inquiries: Mutex<Collection<Inquiry>>,
    service_requests: Mutex<Collection<ServiceRequest>>,
    registration_assistance: Mutex<Collection<RegistrationAssistance>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Collection::new("users")),
            inquiries: Mutex::new(Collection::new("inquiries")),
            service_requests: Mutex::new(Collection::new("service_requests")),
            registration_assistance: Mutex::new(Collection::new("registration_assistance")),
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(collection: &Mutex<Collection<T>>) -> RepoResult<MutexGuard<'_, Collection<T>>> {
    collection.lock().map_err(|poisoned| {
        RepoError::Unavailable(format!(
            "{} lock poisoned by a panicking writer",
            poisoned.get_ref().name
        ))
    })
}

impl RecordStore for MemoryRecordStore {
    fn create_user(&self, input: &NewUser) -> RepoResult<User> {
        let mut users = lock(&self.users)?;
        if users
            .rows
            .values()
            .any(|user| user.username == input.username)
        {
            return Err(RepoError::DuplicateUsername(input.username.clone()));
        }
        Ok(users.insert_with(|id| User::from_input(id, input, created_now())))
    }

    fn get_user(&self, id: RecordId) -> RepoResult<Option<User>> {
        Ok(lock(&self.users)?.get(id))
    }

    fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let users = lock(&self.users)?;
        Ok(users
            .rows
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        Ok(lock(&self.users)?.newest_first(|user| (user.created_at, user.id)))
    }

    fn create_inquiry(&self, input: &NewInquiry) -> RepoResult<Inquiry> {
        Ok(lock(&self.inquiries)?.insert_with(|id| Inquiry::from_input(id, input, created_now())))
    }

    fn get_inquiry(&self, id: RecordId) -> RepoResult<Option<Inquiry>> {
        Ok(lock(&self.inquiries)?.get(id))
    }

    fn list_inquiries(&self) -> RepoResult<Vec<Inquiry>> {
        Ok(lock(&self.inquiries)?.newest_first(|inquiry| (inquiry.created_at, inquiry.id)))
    }

    fn create_service_request(&self, input: &NewServiceRequest) -> RepoResult<ServiceRequest> {
        Ok(lock(&self.service_requests)?
            .insert_with(|id| ServiceRequest::from_input(id, input, created_now())))
    }

    fn get_service_request(&self, id: RecordId) -> RepoResult<Option<ServiceRequest>> {
        Ok(lock(&self.service_requests)?.get(id))
    }

    fn list_service_requests(&self) -> RepoResult<Vec<ServiceRequest>> {
        Ok(lock(&self.service_requests)?.newest_first(|request| (request.created_at, request.id)))
    }

    fn create_registration_assistance(
        &self,
        input: &NewRegistrationAssistance,
    ) -> RepoResult<RegistrationAssistance> {
        Ok(lock(&self.registration_assistance)?
            .insert_with(|id| RegistrationAssistance::from_input(id, input, created_now())))
    }

    fn get_registration_assistance(
        &self,
        id: RecordId,
    ) -> RepoResult<Option<RegistrationAssistance>> {
        Ok(lock(&self.registration_assistance)?.get(id))
    }

    fn list_registration_assistance(&self) -> RepoResult<Vec<RegistrationAssistance>> {
        Ok(lock(&self.registration_assistance)?
            .newest_first(|assistance| (assistance.created_at, assistance.id)))
    }
}
