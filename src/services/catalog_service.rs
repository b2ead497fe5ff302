use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    dto::catalog::{CategoryList, ProductFilter, ProductList},
    entity::{
        categories::{Column as CatCol, Entity as Categories},
        products::{Column as ProdCol, Entity as Products},
    },
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let categories = Categories::find()
        .filter(CatCol::Active.eq(true))
        .order_by_asc(CatCol::DisplayOrder)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        CategoryList { categories },
        Some(Meta::empty()),
    ))
}

pub async fn list_products(
    state: &AppState,
    filter: ProductFilter,
) -> AppResult<ApiResponse<ProductList>> {
    let mut finder = Products::find().filter(ProdCol::Active.eq(true));

    let category = filter
        .category
        .as_deref()
        .map(str::trim)
        .filter(|slug| !slug.is_empty() && *slug != "all");

    finder = match category {
        Some(slug) => finder
            .filter(ProdCol::Category.eq(slug))
            .order_by_asc(ProdCol::Name),
        None => finder
            .order_by_asc(ProdCol::Category)
            .order_by_asc(ProdCol::Name),
    };

    let products = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        ProductList { products },
        Some(Meta::empty()),
    ))
}
