//! [`DiscussionStore`] over the GraphQL API.

use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde_json::json;
use tracing::instrument;

use reconcile::{
    CatalogPage, Category, CategoryId, DiscussionId, DiscussionPage, DiscussionStore, Label,
    LabelId, LabelsPage, Page, RepositoryNodeId, StoreError,
};

use crate::graphql::{
    CatalogRepository, CategoriesRepository, CreateDiscussionData, CreateLabelData,
    LabelsRepository, RepositoryData, SearchData, ADD_DISCUSSION_COMMENT, ADD_LABEL,
    CATALOG_QUERY, CATEGORIES_QUERY, CLOSE_DISCUSSION, CREATE_DISCUSSION, CREATE_LABEL,
    LABELS_QUERY, REMOVE_LABEL, REOPEN_DISCUSSION, SEARCH_QUERY, UPDATE_DISCUSSION,
};
use crate::{GithubClient, GithubError};

/// Search string matching discussions of this repository whose title
/// contains `title`.
pub(crate) fn title_search(repository: &reconcile::RepositorySlug, title: &str) -> String {
    format!("repo:{repository} in:title {title}")
}

impl GithubClient {
    async fn repository_query<R>(
        &self,
        operation: &str,
        query: &str,
        mut variables: serde_json::Value,
    ) -> Result<R, GithubError>
    where
        R: serde::de::DeserializeOwned,
    {
        variables["owner"] = json!(self.repository().owner);
        variables["name"] = json!(self.repository().name);
        let data: RepositoryData<R> = self.graphql(operation, query, variables).await?;
        data.into_repository(&self.repository().to_string())
    }

    /// Runs a mutation whose payload is not needed.
    async fn mutate(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<(), GithubError> {
        let _: IgnoredAny = self.graphql(operation, query, variables).await?;
        Ok(())
    }
}

#[async_trait]
impl DiscussionStore for GithubClient {
    #[instrument(skip(self))]
    async fn catalog_page(
        &self,
        categories_after: Option<&str>,
        labels_after: Option<&str>,
    ) -> Result<CatalogPage, StoreError> {
        let repository: CatalogRepository = self
            .repository_query(
                "RepositoryCategoriesAndLabels",
                CATALOG_QUERY,
                json!({ "categoriesAfter": categories_after, "labelsAfter": labels_after }),
            )
            .await?;
        Ok(CatalogPage {
            repository_id: repository.id,
            categories: repository.discussion_categories,
            labels: repository.labels,
        })
    }

    #[instrument(skip(self))]
    async fn list_categories(&self, after: Option<&str>) -> Result<Page<Category>, StoreError> {
        let repository: CategoriesRepository = self
            .repository_query("RepositoryCategories", CATEGORIES_QUERY, json!({ "after": after }))
            .await?;
        Ok(repository.discussion_categories)
    }

    #[instrument(skip(self))]
    async fn list_labels(&self, after: Option<&str>) -> Result<LabelsPage, StoreError> {
        let repository: LabelsRepository = self
            .repository_query("RepositoryLabels", LABELS_QUERY, json!({ "after": after }))
            .await?;
        Ok(LabelsPage {
            repository_id: repository.id,
            labels: repository.labels,
        })
    }

    #[instrument(skip(self))]
    async fn search_by_title(
        &self,
        title: &str,
        labels_after: Option<&str>,
    ) -> Result<Option<DiscussionPage>, StoreError> {
        let query = title_search(self.repository(), title);
        let data: SearchData = self
            .graphql(
                "SearchDiscussions",
                SEARCH_QUERY,
                json!({ "query": query, "labelsAfter": labels_after }),
            )
            .await?;
        Ok(data.into_first())
    }

    #[instrument(skip(self, body))]
    async fn create_discussion(
        &self,
        repository_id: &RepositoryNodeId,
        title: &str,
        body: &str,
        category_id: &CategoryId,
    ) -> Result<DiscussionId, StoreError> {
        let data: CreateDiscussionData = self
            .graphql(
                "CreateDiscussion",
                CREATE_DISCUSSION,
                json!({
                    "repositoryId": repository_id,
                    "title": title,
                    "body": body,
                    "categoryId": category_id,
                }),
            )
            .await?;
        Ok(data.create_discussion.discussion.id)
    }

    #[instrument(skip(self, body))]
    async fn update_body(&self, id: &DiscussionId, body: &str) -> Result<(), StoreError> {
        self.mutate(
            "UpdateDiscussion",
            UPDATE_DISCUSSION,
            json!({ "discussionId": id, "body": body }),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, body))]
    async fn add_comment(&self, id: &DiscussionId, body: &str) -> Result<(), StoreError> {
        self.mutate(
            "AddDiscussionComment",
            ADD_DISCUSSION_COMMENT,
            json!({ "discussionId": id, "body": body }),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_label(&self, id: &DiscussionId, label_id: &LabelId) -> Result<(), StoreError> {
        self.mutate(
            "AddLabel",
            ADD_LABEL,
            json!({ "discussionId": id, "labelId": label_id }),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_label(&self, id: &DiscussionId, label_id: &LabelId) -> Result<(), StoreError> {
        self.mutate(
            "RemoveLabel",
            REMOVE_LABEL,
            json!({ "discussionId": id, "labelId": label_id }),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn close(&self, id: &DiscussionId) -> Result<(), StoreError> {
        self.mutate("CloseDiscussion", CLOSE_DISCUSSION, json!({ "discussionId": id }))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn reopen(&self, id: &DiscussionId) -> Result<(), StoreError> {
        self.mutate("ReopenDiscussion", REOPEN_DISCUSSION, json!({ "discussionId": id }))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_label(
        &self,
        repository_id: &RepositoryNodeId,
        name: &str,
        color: &str,
        description: &str,
    ) -> Result<Label, StoreError> {
        let data: CreateLabelData = self
            .graphql(
                "CreateLabel",
                CREATE_LABEL,
                json!({
                    "repositoryId": repository_id,
                    "name": name,
                    "color": color,
                    "description": description,
                }),
            )
            .await?;
        Ok(data.create_label.label)
    }
}
