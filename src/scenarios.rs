//! Narrative test scenarios and the suite orchestrator.
//!
//! Each scenario is a fixed linear script over [`ScimClient`] operations:
//! create, verify, mutate, verify, delete, verify absence. A failed step ends
//! the scenario early; when a test user has already been created, the
//! scenario makes one best-effort delete before returning. There are no
//! retries and no rollback beyond that single delete.

use crate::client::ScimClient;
use crate::payload::{
    UserPayloadBuilder, extend_attrs, extic_groups, resource_id, role, total_results,
    unique_user_name,
};
use crate::report::SuiteReport;
use std::time::Instant;

/// Extic group granting baseline access.
const BASIC_GROUP: &str = "Standard Users";
/// Extic group granting advanced access.
const RESEARCH_GROUP: &str = "Research";
/// Extic group granting administrative access.
const ADMIN_GROUP: &str = "Administrators";
/// Extension role assigned alongside the admin group.
const ADMIN_ROLE: &str = "Administrator";

/// Sequences client operations into pass/fail scenarios.
pub struct ScenarioRunner {
    client: ScimClient,
}

impl ScenarioRunner {
    /// Wrap a client for scenario execution.
    pub fn new(client: ScimClient) -> Self {
        Self { client }
    }

    /// The underlying client, for ad-hoc operations around a run.
    pub fn client(&self) -> &ScimClient {
        &self.client
    }

    /// Create → fetch → update → verify → delete → verify absence.
    pub async fn crud_lifecycle(&self) -> bool {
        let log = self.client.log();
        log.line("=== CRUD lifecycle scenario ===");

        let user_name = unique_user_name("testuser");
        let payload = UserPayloadBuilder::new(&user_name)
            .password("TestP@ssw0rd")
            .display_name("Test User")
            .group(BASIC_GROUP)
            .extend_attr("accessLevel", "basic")
            .build();

        let Some(created) = self.client.create_user(&payload).await else {
            log.line("create step failed");
            return false;
        };
        let Some(user_id) = resource_id(&created) else {
            log.line("created user carries no id");
            return false;
        };

        if self.client.get_user_by_id(&user_id).await.is_none() {
            log.line("fetch-after-create failed");
            self.client.delete_user(&user_id).await;
            return false;
        }

        let update = UserPayloadBuilder::new(&user_name)
            .display_name("Test User (updated)")
            .group(RESEARCH_GROUP)
            .extend_attr("accessLevel", "advanced")
            .build();
        if self.client.update_user(&user_id, &update).await.is_none() {
            log.line("update step failed");
            self.client.delete_user(&user_id).await;
            return false;
        }

        let Some(refreshed) = self.client.get_user_by_id(&user_id).await else {
            log.line("fetch-after-update failed");
            self.client.delete_user(&user_id).await;
            return false;
        };
        if extic_groups(&refreshed).contains(&RESEARCH_GROUP) {
            log.line("group change confirmed");
        } else {
            log.line(format!(
                "group change not reflected, groups: {:?}",
                extic_groups(&refreshed)
            ));
            self.client.delete_user(&user_id).await;
            return false;
        }

        if !self.client.delete_user(&user_id).await {
            log.line("delete step failed");
            return false;
        }
        if self.client.get_user_by_id(&user_id).await.is_some() {
            log.line("user still present after delete");
            return false;
        }
        log.line("delete confirmed");
        log.line("=== CRUD lifecycle scenario complete ===");
        true
    }

    /// Escalate a user through basic → research → admin groups, verifying the
    /// final role.
    pub async fn group_based_access(&self) -> bool {
        let log = self.client.log();
        log.line("=== group-based access scenario ===");

        let user_name = unique_user_name("basic_user");
        let payload = UserPayloadBuilder::new(&user_name)
            .password("BasicP@ss123")
            .display_name("Basic User")
            .group(BASIC_GROUP)
            .extend_attr("accessLevel", "basic")
            .build();
        let Some(created) = self.client.create_user(&payload).await else {
            log.line("basic user creation failed");
            return false;
        };
        let Some(user_id) = resource_id(&created) else {
            log.line("created user carries no id");
            return false;
        };

        log.line("moving user to the research group");
        let research = UserPayloadBuilder::new(&user_name)
            .display_name("Basic User")
            .group(RESEARCH_GROUP)
            .extend_attr("accessLevel", "advanced")
            .build();
        if self.client.update_user(&user_id, &research).await.is_none() {
            log.line("research group update failed");
            self.client.delete_user(&user_id).await;
            return false;
        }

        log.line("moving user to the administrator group");
        let admin = UserPayloadBuilder::new(&user_name)
            .display_name("Basic User")
            .group(ADMIN_GROUP)
            .role(ADMIN_ROLE)
            .extend_attr("accessLevel", "admin")
            .build();
        if self.client.update_user(&user_id, &admin).await.is_none() {
            log.line("administrator group update failed");
            self.client.delete_user(&user_id).await;
            return false;
        }

        let Some(final_user) = self.client.get_user_by_id(&user_id).await else {
            log.line("final user fetch failed");
            self.client.delete_user(&user_id).await;
            return false;
        };
        log.line(format!(
            "final role: {}",
            role(&final_user).unwrap_or("<none>")
        ));

        self.client.delete_user(&user_id).await;
        log.line("scenario user deleted");
        true
    }

    /// Round-trip extended attributes: create with three pairs, mutate two and
    /// append a fourth, log both snapshots.
    pub async fn extended_attributes(&self) -> bool {
        let log = self.client.log();
        log.line("=== extended attributes scenario ===");

        let user_name = unique_user_name("ext_user");
        let payload = UserPayloadBuilder::new(&user_name)
            .password("ExtP@ss123")
            .display_name("Extended Attribute User")
            .group(BASIC_GROUP)
            .extend_attr("accessLevel", "basic")
            .extend_attr("department", "Research & Development")
            .extend_attr("projectCode", "PRJ-001")
            .build();
        let Some(created) = self.client.create_user(&payload).await else {
            log.line("extended attribute user creation failed");
            return false;
        };
        let Some(user_id) = resource_id(&created) else {
            log.line("created user carries no id");
            return false;
        };

        let Some(fetched) = self.client.get_user_by_id(&user_id).await else {
            log.line("extended attribute user fetch failed");
            self.client.delete_user(&user_id).await;
            return false;
        };
        log.line("extended attributes:");
        for (name, value) in extend_attrs(&fetched) {
            log.line(format!("  {name}: {value}"));
        }

        log.line("updating extended attributes");
        let update = UserPayloadBuilder::new(&user_name)
            .display_name("Extended Attribute User")
            .group(BASIC_GROUP)
            .extend_attr("accessLevel", "basic")
            .extend_attr("department", "Marketing")
            .extend_attr("projectCode", "PRJ-002")
            .extend_attr("location", "Tokyo Office")
            .build();
        let Some(updated) = self.client.update_user(&user_id, &update).await else {
            log.line("extended attribute update failed");
            self.client.delete_user(&user_id).await;
            return false;
        };
        log.line("updated extended attributes:");
        for (name, value) in extend_attrs(&updated) {
            log.line(format!("  {name}: {value}"));
        }

        self.client.delete_user(&user_id).await;
        log.line("extended attribute user deleted");
        true
    }

    /// Crude wall-clock timing of repeated list calls. Reports success once
    /// the loop completes; individual request failures are already logged by
    /// the client.
    pub async fn performance(&self, iterations: usize) -> bool {
        let log = self.client.log();
        log.line(format!("=== performance scenario ({iterations} iterations) ==="));

        let start = Instant::now();
        for i in 0..iterations {
            log.line(format!("iteration {}/{iterations}", i + 1));
            let iteration_start = Instant::now();
            self.client.get_users(1, 20).await;
            log.line(format!(
                "list duration: {:.3}s",
                iteration_start.elapsed().as_secs_f64()
            ));
        }

        let total = start.elapsed().as_secs_f64();
        log.line(format!("total duration: {total:.3}s"));
        if iterations > 0 {
            log.line(format!(
                "mean request duration: {:.3}s",
                total / iterations as f64
            ));
        }
        true
    }

    /// Search on the extension attributes with a compound filter expression.
    pub async fn filtered_search(&self) -> bool {
        let log = self.client.log();
        log.line("=== filtered search scenario ===");

        let filter =
            "(extendAttrs.name eq \"accessLevel\") and (extendAttrs.value eq \"advanced\")";
        match self.client.search_with_filter(filter).await {
            Some(body) => {
                log.line(format!("advanced access users: {}", total_results(&body)));
                true
            }
            None => false,
        }
    }

    /// Create a batch of users, then delete them all. Passes iff every user
    /// that was actually created is deleted again; creation failures shrink
    /// the batch but are only reported.
    pub async fn bulk_operations(&self, user_count: usize) -> bool {
        let log = self.client.log();
        log.line(format!("=== bulk operations scenario ({user_count} users) ==="));

        let mut created = Vec::new();
        for i in 0..user_count {
            let user_name = unique_user_name(&format!("bulk_user_{i}"));
            let payload = UserPayloadBuilder::new(&user_name)
                .password(format!("BulkP@ss{i}"))
                .display_name(format!("Bulk Test User {i}"))
                .group(BASIC_GROUP)
                .build();
            if let Some(user) = self.client.create_user(&payload).await
                && let Some(id) = resource_id(&user)
            {
                created.push(id);
            }
        }
        log.line(format!("created {}/{user_count} users", created.len()));

        let mut deleted = 0usize;
        for id in &created {
            if self.client.delete_user(id).await {
                deleted += 1;
            }
        }
        log.line(format!("deleted {deleted}/{} users", created.len()));
        deleted == created.len()
    }

    /// Run the full suite in fixed order.
    ///
    /// The connectivity probe gates everything: on failure the suite aborts
    /// with an empty outcome list. Every other scenario runs regardless of
    /// prior outcomes, and each result lands in the report so the overall
    /// verdict reflects all of them.
    pub async fn run_all(&self) -> SuiteReport {
        let log = self.client.log();
        log.line("==== SCIM API test suite start ====");

        let mut report = SuiteReport {
            connected: self.client.probe_connection().await,
            ..SuiteReport::default()
        };
        if !report.connected {
            log.line("connectivity probe failed, aborting suite");
            return report;
        }

        report.record("crud-lifecycle", self.crud_lifecycle().await);
        report.record("group-based-access", self.group_based_access().await);
        report.record("extended-attributes", self.extended_attributes().await);
        report.record("performance", self.performance(5).await);
        report.record("filtered-search", self.filtered_search().await);
        report.record("bulk-operations", self.bulk_operations(2).await);

        for name in report.failures() {
            log.line(format!("scenario failed: {name}"));
        }
        log.line("==== SCIM API test suite complete ====");
        report
    }
}
