use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            ChangePasswordRequest, LoginData, LoginRequest, RegisterData, RegisterRequest,
            UpdateProfileRequest,
        },
        deliveries::{
            CreateDeliveryRequest, DeliveryCreated, DeliveryList, TrackingResult,
            UpdateDeliveryStatusRequest, UserDeliveryList,
        },
        orders::{
            CreateOrderItem, CreateOrderRequest, OrderCreated, OrderDetail, OrderList,
            UpdateOrderStatusRequest, UserOrderList,
        },
        payments::{
            PaymentCreateForm, PaymentCreated, PaymentList, UpdatePaymentStatusRequest,
            UserPaymentList,
        },
        products::{
            CreateProductRequest, ProductList, ProductSearchResults, UpdateProductRequest,
        },
        reviews::{
            CreateReviewRequest, ReviewCreated, ReviewList, UpdateReviewRequest, UserReviewList,
        },
    },
    models::{
        Delivery, Order, Payment, Product, ProductRating, ProductWithCategory, Review,
        UserProfile,
    },
    response::ApiResponse,
    routes::{auth, deliveries, health, orders, params, payments, products, reviews},
};

// Sessions carry the real identity; the bearer scheme documents the token
// path, which is accepted without validation and resolves to no user.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        auth::profile,
        auth::update_profile,
        auth::change_password,
        products::list_products,
        products::search_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        orders::create_order,
        orders::list_orders,
        orders::my_orders,
        orders::get_order,
        orders::update_order_status,
        orders::order_statistics,
        payments::create_payment,
        payments::get_order_payment,
        payments::update_payment_status,
        payments::update_order_payment_status,
        payments::my_payments,
        payments::list_payments,
        deliveries::create_delivery,
        deliveries::get_order_delivery,
        deliveries::get_delivery,
        deliveries::update_delivery_status,
        deliveries::my_deliveries,
        deliveries::list_deliveries,
        deliveries::search_tracking,
        reviews::create_review,
        reviews::product_reviews,
        reviews::product_rating,
        reviews::update_review,
        reviews::delete_review,
        reviews::my_reviews
    ),
    components(
        schemas(
            UserProfile,
            Product,
            ProductWithCategory,
            Order,
            Payment,
            Delivery,
            Review,
            ProductRating,
            RegisterRequest,
            RegisterData,
            LoginRequest,
            LoginData,
            UpdateProfileRequest,
            ChangePasswordRequest,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            ProductSearchResults,
            CreateOrderItem,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            OrderCreated,
            OrderDetail,
            OrderList,
            UserOrderList,
            PaymentCreateForm,
            UpdatePaymentStatusRequest,
            PaymentCreated,
            PaymentList,
            UserPaymentList,
            CreateDeliveryRequest,
            UpdateDeliveryStatusRequest,
            DeliveryCreated,
            DeliveryList,
            UserDeliveryList,
            TrackingResult,
            CreateReviewRequest,
            UpdateReviewRequest,
            ReviewCreated,
            ReviewList,
            UserReviewList,
            params::Pagination,
            ApiResponse<UserProfile>,
            ApiResponse<ProductList>,
            ApiResponse<OrderDetail>,
            ApiResponse<TrackingResult>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Registration, sessions and profile"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Payments", description = "Payment endpoints"),
        (name = "Deliveries", description = "Delivery and tracking endpoints"),
        (name = "Reviews", description = "Product review endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
