//! Redmine manager
//!
//! Entry point for every operation against a server.
//!
//! # Overview
//!
//! [`RedmineManager`] combines a [`Transport`], a [`Codec`], the pagination
//! dialect and the page size. List operations walk every page through
//! [`PagedFetcher`]; object operations are single requests.

use crate::auth::AuthConfig;
use crate::codec::{Codec, XmlCodec};
use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpClient, HttpClientConfig, Transport};
use crate::model::{
    Attachment, Identifiable, Issue, IssueCategory, IssueRelation, IssueStatus, News, ObjectKind,
    Project, RelationType, Resource, SavedQuery, TimeEntry, Tracker, User, Version, Writable,
};
use crate::pagination::{ExactBodyMatch, PagedFetcher, RepeatedPageCheck};
use crate::types::{Dialect, Include, QueryParams};
use crate::uri;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info};

/// Page size used unless configured otherwise
pub const DEFAULT_OBJECTS_PER_PAGE: usize = 25;

/// Client for one server
pub struct RedmineManager<T = HttpClient, C = XmlCodec> {
    transport: T,
    codec: C,
    dialect: Dialect,
    objects_per_page: usize,
    repeat_check: Arc<dyn RepeatedPageCheck>,
}

impl RedmineManager {
    /// Connect to a server over HTTP
    ///
    /// `base_url` is the complete server address including protocol and
    /// port, e.g. `http://demo.redmine.org:8080`.
    pub fn connect(base_url: &str, auth: AuthConfig) -> Result<Self> {
        let url = uri::parse_base_url(base_url)?;
        let config = HttpClientConfig::builder().base_url(url.as_str()).build();
        Ok(Self::new(HttpClient::with_auth(config, auth)?))
    }
}

impl<T: Transport> RedmineManager<T, XmlCodec> {
    /// Manager speaking XML over the given transport
    pub fn new(transport: T) -> Self {
        Self::with_codec(transport, XmlCodec)
    }
}

impl<T: Transport, C: Codec> RedmineManager<T, C> {
    pub fn with_codec(transport: T, codec: C) -> Self {
        Self {
            transport,
            codec,
            dialect: Dialect::default(),
            objects_per_page: DEFAULT_OBJECTS_PER_PAGE,
            repeat_check: Arc::new(ExactBodyMatch),
        }
    }

    /// Set the pagination dialect
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the repeated-page detection used with [`Dialect::PageNumber`]
    #[must_use]
    pub fn with_repeat_check(mut self, check: Arc<dyn RepeatedPageCheck>) -> Self {
        self.repeat_check = check;
        self
    }

    /// Builder-style [`set_objects_per_page`](Self::set_objects_per_page)
    pub fn with_objects_per_page(mut self, page_size: usize) -> Result<Self> {
        self.set_objects_per_page(page_size)?;
        Ok(self)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Number of objects requested per list request
    pub fn objects_per_page(&self) -> usize {
        self.objects_per_page
    }

    /// Change the number of objects requested per list request
    pub fn set_objects_per_page(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(Error::invalid_value(
                "objects_per_page",
                "page size must be greater than zero",
            ));
        }
        self.objects_per_page = page_size;
        Ok(())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Issues
    // ========================================================================

    /// Create an issue in the project with the given identifier
    ///
    /// `project_key` is the string identifier (`project-abc`), not the
    /// numeric id.
    pub async fn create_issue(&self, project_key: &str, issue: &Issue) -> Result<Issue> {
        let body = self
            .codec
            .encode_payload(ObjectKind::Issue, &issue.payload_for_project(project_key))?;
        let response = self
            .transport
            .send(ApiRequest::post(uri::collection(ObjectKind::Issue), body))
            .await?;
        let created: Issue = self.codec.decode(&response)?;
        info!(id = ?created.id, project = project_key, "Created issue");
        Ok(created)
    }

    /// Issues whose subject matches exactly, optionally within one project
    pub async fn get_issues_by_summary(
        &self,
        project_key: Option<&str>,
        subject: &str,
    ) -> Result<Vec<Issue>> {
        let mut params = QueryParams::new().with("subject", subject);
        params.insert_opt("project_id", project_key);
        self.fetch_list(params).await
    }

    /// Issues matching arbitrary filter parameters
    pub async fn get_issues_with_params(&self, params: QueryParams) -> Result<Vec<Issue>> {
        self.fetch_list(params).await
    }

    /// Issues of a project and/or saved query, with associated data
    pub async fn get_issues(
        &self,
        project_key: Option<&str>,
        query_id: Option<u32>,
        includes: &[Include],
    ) -> Result<Vec<Issue>> {
        let mut params = QueryParams::new();
        if let Some(query_id) = query_id {
            params.insert("query_id", query_id.to_string());
        }
        params.insert_opt("project_id", project_key);
        params.insert("include", Include::join(includes));
        self.fetch_list(params).await
    }

    pub async fn get_issue_by_id(&self, id: u32, includes: &[Include]) -> Result<Issue> {
        // an empty include value is accepted by the server
        let params = QueryParams::new().with("include", Include::join(includes));
        self.get_object(uri::object(ObjectKind::Issue, id), params).await
    }

    pub async fn delete_issue(&self, id: u32) -> Result<()> {
        self.delete(uri::object(ObjectKind::Issue, id)).await
    }

    // ========================================================================
    // Projects
    // ========================================================================

    /// Projects visible to the current user, with their trackers
    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        self.fetch_list(QueryParams::new().with("include", "trackers")).await
    }

    pub async fn get_project_by_key(&self, project_key: &str) -> Result<Project> {
        let params = QueryParams::new().with("include", "trackers");
        self.get_object(uri::object(ObjectKind::Project, project_key), params).await
    }

    pub async fn create_project(&self, project: &Project) -> Result<Project> {
        let params = QueryParams::new().with("include", "trackers");
        self.create_object(uri::collection(ObjectKind::Project), project, params).await
    }

    pub async fn delete_project(&self, project_key: &str) -> Result<()> {
        self.delete(uri::object(ObjectKind::Project, project_key)).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// All users; requires administrator rights
    pub async fn get_users(&self) -> Result<Vec<User>> {
        self.fetch_list(QueryParams::new()).await
    }

    pub async fn get_user_by_id(&self, id: u32) -> Result<User> {
        self.get_object(uri::object(ObjectKind::User, id), QueryParams::new()).await
    }

    /// The user the credentials belong to
    pub async fn get_current_user(&self) -> Result<User> {
        self.get_object(uri::current_user(), QueryParams::new()).await
    }

    pub async fn create_user(&self, user: &User) -> Result<User> {
        self.create_object(uri::collection(ObjectKind::User), user, QueryParams::new()).await
    }

    pub async fn delete_user(&self, id: u32) -> Result<()> {
        self.delete(uri::object(ObjectKind::User, id)).await
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Send the object's current state to the server
    ///
    /// The server answers an update with an empty body, so nothing is
    /// returned.
    pub async fn update<W: Writable>(&self, obj: &W) -> Result<()> {
        obj.validate_update()?;
        let id = require_id(obj, W::KIND)?;
        let body = self.codec.encode(obj)?;
        self.transport
            .send(ApiRequest::put(uri::object(W::KIND, id), body))
            .await?;
        debug!(kind = %W::KIND, id, "Updated object");
        Ok(())
    }

    // ========================================================================
    // Time Entries
    // ========================================================================

    pub async fn get_time_entries(&self) -> Result<Vec<TimeEntry>> {
        self.fetch_list(QueryParams::new()).await
    }

    pub async fn get_time_entry(&self, id: u32) -> Result<TimeEntry> {
        self.get_object(uri::object(ObjectKind::TimeEntry, id), QueryParams::new()).await
    }

    pub async fn get_time_entries_for_issue(&self, issue_id: u32) -> Result<Vec<TimeEntry>> {
        self.fetch_list(QueryParams::new().with("issue_id", issue_id.to_string())).await
    }

    /// Create a time entry; it must reference an issue or a project
    pub async fn create_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry> {
        self.create_object(
            uri::collection(ObjectKind::TimeEntry),
            entry,
            QueryParams::new(),
        )
        .await
    }

    pub async fn delete_time_entry(&self, id: u32) -> Result<()> {
        self.delete(uri::object(ObjectKind::TimeEntry, id)).await
    }

    // ========================================================================
    // Saved Queries
    // ========================================================================

    /// Saved queries visible to the current user, optionally for one project
    pub async fn get_saved_queries(&self, project_key: Option<&str>) -> Result<Vec<SavedQuery>> {
        let mut params = QueryParams::new();
        params.insert_opt("project_id", project_key);
        self.fetch_list(params).await
    }

    // ========================================================================
    // Relations
    // ========================================================================

    pub async fn create_relation(
        &self,
        issue_id: u32,
        issue_to_id: u32,
        relation_type: RelationType,
    ) -> Result<IssueRelation> {
        let relation = IssueRelation::new(issue_id, issue_to_id, relation_type);
        self.create_object(uri::issue_relations(issue_id), &relation, QueryParams::new()).await
    }

    pub async fn delete_relation(&self, id: u32) -> Result<()> {
        self.delete(uri::object(ObjectKind::IssueRelation, id)).await
    }

    /// Delete every relation listed on the issue
    ///
    /// The issue must have been loaded with [`Include::Relations`].
    pub async fn delete_issue_relations(&self, issue: &Issue) -> Result<()> {
        for relation in &issue.relations {
            let id = require_id(relation, ObjectKind::IssueRelation)?;
            self.delete_relation(id).await?;
        }
        Ok(())
    }

    /// Load the issue's relations and delete them
    pub async fn delete_issue_relations_by_issue_id(&self, issue_id: u32) -> Result<()> {
        let issue = self
            .get_issue_by_id(issue_id, &[Include::Relations])
            .await?;
        self.delete_issue_relations(&issue).await
    }

    // ========================================================================
    // Versions
    // ========================================================================

    /// Create a version in the project it references
    pub async fn create_version(&self, version: &Version) -> Result<Version> {
        let project_id = version.project.as_ref().map_or(0, |p| p.id);
        self.create_object(uri::project_versions(project_id), version, QueryParams::new()).await
    }

    pub async fn delete_version(&self, version: &Version) -> Result<()> {
        let id = require_id(version, ObjectKind::Version)?;
        self.delete(uri::object(ObjectKind::Version, id)).await
    }

    /// Versions of a project, fetched in a single request
    pub async fn get_versions(&self, project_id: u32) -> Result<Vec<Version>> {
        let params = QueryParams::new().with("include", "projects");
        self.get_single_list(uri::project_versions(project_id), params).await
    }

    pub async fn get_version_by_id(&self, id: u32) -> Result<Version> {
        self.get_object(uri::object(ObjectKind::Version, id), QueryParams::new()).await
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// Issue categories of a project, fetched in a single request
    pub async fn get_categories(&self, project_id: u32) -> Result<Vec<IssueCategory>> {
        self.get_single_list(uri::project_categories(project_id), QueryParams::new()).await
    }

    /// Create a category in the project it references
    pub async fn create_category(&self, category: &IssueCategory) -> Result<IssueCategory> {
        let project_id = category.project.as_ref().map_or(0, |p| p.id);
        self.create_object(
            uri::project_categories(project_id),
            category,
            QueryParams::new(),
        )
        .await
    }

    pub async fn delete_category(&self, category: &IssueCategory) -> Result<()> {
        let id = require_id(category, ObjectKind::IssueCategory)?;
        self.delete(uri::object(ObjectKind::IssueCategory, id)).await
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub async fn get_statuses(&self) -> Result<Vec<IssueStatus>> {
        self.fetch_list(QueryParams::new()).await
    }

    pub async fn get_trackers(&self) -> Result<Vec<Tracker>> {
        self.fetch_list(QueryParams::new()).await
    }

    /// News, optionally for one project
    pub async fn get_news(&self, project_key: Option<&str>) -> Result<Vec<News>> {
        let mut params = QueryParams::new();
        params.insert_opt("project_id", project_key);
        self.fetch_list(params).await
    }

    // ========================================================================
    // Attachments
    // ========================================================================

    pub async fn get_attachment_by_id(&self, id: u32) -> Result<Attachment> {
        self.get_object(uri::object(ObjectKind::Attachment, id), QueryParams::new()).await
    }

    /// Download the file behind an attachment's content URL
    pub async fn download_attachment_content(&self, attachment: &Attachment) -> Result<Bytes> {
        let url = attachment.content_url.as_deref().ok_or_else(|| {
            Error::validation(format!(
                "attachment {:?} has no content URL",
                attachment.id
            ))
        })?;
        let content = self.transport.download(url).await?;
        debug!(url, bytes = content.len(), "Downloaded attachment");
        Ok(content)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn fetcher(&self) -> PagedFetcher<'_, T, C> {
        PagedFetcher::new(&self.transport, &self.codec, self.dialect)
            .with_repeat_check(self.repeat_check.clone())
    }

    async fn fetch_list<R: Resource>(&self, params: QueryParams) -> Result<Vec<R>> {
        self.fetcher()
            .fetch_all::<R>(params, self.objects_per_page)
            .await
    }

    async fn get_single_list<R: Resource>(
        &self,
        path: String,
        params: QueryParams,
    ) -> Result<Vec<R>> {
        let body = self
            .transport
            .send(ApiRequest::get(path).query(params))
            .await?;
        Ok(self.codec.decode_list::<R>(&body)?.items)
    }

    async fn get_object<R: Resource>(&self, path: String, params: QueryParams) -> Result<R> {
        let body = self
            .transport
            .send(ApiRequest::get(path).query(params))
            .await?;
        self.codec.decode(&body)
    }

    async fn create_object<W: Writable>(
        &self,
        path: String,
        obj: &W,
        params: QueryParams,
    ) -> Result<W> {
        obj.validate_create()?;
        let body = self.codec.encode(obj)?;
        let response = self
            .transport
            .send(ApiRequest::post(path, body).query(params))
            .await?;
        let created: W = self.codec.decode(&response)?;
        info!(kind = %W::KIND, id = ?created.id(), "Created object");
        Ok(created)
    }

    async fn delete(&self, path: String) -> Result<()> {
        self.transport.send(ApiRequest::delete(path.clone())).await?;
        debug!(path = %path, "Deleted object");
        Ok(())
    }
}

fn require_id(obj: &impl Identifiable, kind: ObjectKind) -> Result<u32> {
    obj.id()
        .ok_or_else(|| Error::validation(format!("{kind} has no id; it must be created first")))
}

impl<T, C> std::fmt::Debug for RedmineManager<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedmineManager")
            .field("dialect", &self.dialect)
            .field("objects_per_page", &self.objects_per_page)
            .finish_non_exhaustive()
    }
}
