/// Declare a store trait and everything needed to discover and synthesize it.
///
/// ```ignore
/// pipe_store! {
///     /// Pizza menu
///     #[store]
///     #[item(Pizza, "pizzas")]
///     pub trait MyRestaurant {
///         #[pipeline_run("matchingPizzas")]
///         fn get_pizzas_by_size(&self, pizza_size: String) -> PipelineStream<Pizza>;
///
///         fn find_by_id(&self, id: String) -> Option<Pizza>;
///     }
/// }
/// ```
///
/// Expands to an async trait whose methods return `StoreResult<_>`, its implementation
/// for `SynthesizedStore<dyn Trait>`, and a `StoreInterface` impl publishing the
/// declaration under `module_path!()::Trait`. Register it with
/// `TypeCatalog::declare_store::<dyn Trait>()`.
///
/// Arguments must be owned `Serialize` types; `#[item]` and `#[profile]` attributes
/// follow `#[store]` in that order.
#[macro_export]
macro_rules! pipe_store {
    (
        $(#[doc = $doc:literal])*
        #[store]
        $(#[item($model:ty, $collection:literal)])*
        $(#[profile($profile:literal)])*
        $vis:vis trait $name:ident {
            $(
                $(#[doc = $method_doc:literal])*
                $(#[pipeline_run($pipeline_id:literal)])?
                fn $method:ident(&self $(, $arg:ident : $arg_ty:ty)*) -> $ret:ty;
            )*
        }
    ) => {
        $(#[doc = $doc])*
        #[$crate::__private::async_trait]
        $vis trait $name: Send + Sync {
            $(
                $(#[doc = $method_doc])*
                async fn $method(&self $(, $arg: $arg_ty)*) -> $crate::error::StoreResult<$ret>;
            )*
        }

        #[$crate::__private::async_trait]
        impl $name for $crate::store::SynthesizedStore<dyn $name> {
            $(
                async fn $method(&self $(, $arg: $arg_ty)*) -> $crate::error::StoreResult<$ret> {
                    let args = ::std::vec![
                        $($crate::store::encode_arg(stringify!($method), stringify!($arg), &$arg)?),*
                    ];
                    self.handle().invoke::<$ret>(stringify!($method), args).await
                }
            )*
        }

        impl $crate::store::StoreInterface for dyn $name {
            fn declaration() -> $crate::store::StoreDeclaration {
                $crate::store::StoreDeclaration::interface(concat!(module_path!(), "::", stringify!($name)))
                    $(.item::<$model>($collection))*
                    $(.profile($profile))*
                    $(
                        .method(
                            $crate::store::MethodDecl::new(stringify!($method))
                                $(.pipeline_run($pipeline_id))?
                                $(.arg::<$arg_ty>(stringify!($arg)))*
                                .returns::<$ret>(),
                        )
                    )*
                    .instantiate(|handle| {
                        $crate::host::Component::new::<dyn $name>(::std::sync::Arc::new(
                            $crate::store::SynthesizedStore::<dyn $name>::new(handle),
                        ))
                    })
            }
        }
    };
}
