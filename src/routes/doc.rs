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
        admin::{
            ApprovalRequest, ApprovalResult, OrderStatusResult, OrderSummary, OrderSummaryList,
            PendingProducer, PendingProducerList, PendingProduct, PendingProductList,
            PlatformSettings, UpdateOrderStatusRequest, UpdateSettingsRequest, UserStatusRequest,
            UserStatusResult, UserSummary, UserSummaryList,
        },
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        stats::{
            ActivityItem, AnalyticsReport, Notification, Overview, PaymentStatsReport,
            PendingStats, RealtimeStats, SystemHealth,
        },
    },
    models::{Product, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, health, products as product_routes},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        product_routes::list_products,
        product_routes::get_product,
        admin::overview,
        admin::pending_producers,
        admin::producer_approval,
        admin::pending_products,
        admin::product_approval,
        admin::list_users,
        admin::user_status,
        admin::analytics,
        admin::system_health,
        admin::list_orders,
        admin::order_status,
        admin::payment_stats,
        admin::get_settings,
        admin::update_settings,
        admin::realtime_stats,
        admin::notifications,
        admin::recent_activity,
        admin::pending_stats
    ),
    components(
        schemas(
            User,
            Product,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ApprovalRequest,
            ApprovalResult,
            UserStatusRequest,
            UserStatusResult,
            UpdateOrderStatusRequest,
            OrderStatusResult,
            PendingProducer,
            PendingProducerList,
            PendingProduct,
            PendingProductList,
            UserSummary,
            UserSummaryList,
            OrderSummary,
            OrderSummaryList,
            PlatformSettings,
            UpdateSettingsRequest,
            Overview,
            PendingStats,
            RealtimeStats,
            Notification,
            AnalyticsReport,
            PaymentStatsReport,
            ActivityItem,
            SystemHealth,
            product_routes::ProductList,
            Meta,
            ApiResponse<User>,
            ApiResponse<Product>,
            ApiResponse<LoginResponse>,
            ApiResponse<Overview>,
            ApiResponse<PendingProducerList>,
            ApiResponse<PendingProductList>,
            ApiResponse<UserSummaryList>,
            ApiResponse<OrderSummaryList>,
            ApiResponse<product_routes::ProductList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Public catalog endpoints"),
        (name = "Admin", description = "Admin dashboard and moderation endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
