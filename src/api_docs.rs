use crate::api;
use crate::services::commerce_service::{
    CreateBusinessInput, CreateCartInput, CreateCartItemInput, CreateChatInput,
    CreateNotificationInput, CreateOrderInput, CreatePaymentInput, CreateProductInput,
    CreateReviewInput, CreateUserInput,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::commerce::create_user,
        api::commerce::create_business,
        api::commerce::create_product,
        api::commerce::create_order,
        api::commerce::create_payment,
        api::commerce::create_chat,
        api::commerce::create_notification,
        api::commerce::create_review,
        api::commerce::create_cart,
        api::commerce::create_cart_item,
        api::common::get_entity,
        api::common::delete_entity,
        api::common::recover_entity,
    ),
    components(schemas(
        CreateUserInput,
        CreateBusinessInput,
        CreateProductInput,
        CreateOrderInput,
        CreatePaymentInput,
        CreateChatInput,
        CreateNotificationInput,
        CreateReviewInput,
        CreateCartInput,
        CreateCartItemInput,
    )),
    tags(
        (name = "foodglobal", description = "foodglobal storefront API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;
    use utoipa::openapi::PathItemType;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/health"));
        for kind in EntityKind::ALL {
            let create = format!("/api/{}", kind.path());
            let item = paths.get(&create).unwrap_or_else(|| panic!("{create} missing"));
            assert!(item.operations.contains_key(&PathItemType::Post));
        }

        let shared = &paths["/api/{kind}/{id}"];
        assert!(shared.operations.contains_key(&PathItemType::Get));
        assert!(shared.operations.contains_key(&PathItemType::Delete));
        assert!(paths["/api/{kind}/{id}/restore"]
            .operations
            .contains_key(&PathItemType::Put));

        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("CreateOrderInput"));
        assert!(schemas.contains_key("CreateCartItemInput"));
    }
}
