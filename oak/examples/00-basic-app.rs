use oak::application;
use oak::provider::{BootFlag, ProviderRegistration, ServiceProvider};
use oak_di::binding::Implementation;
use oak_di::container::{Container, TypedContainer};
use oak_di::contract::Contract;
use oak_di::error::{convert_error, ErrorPtr};
use oak_di::instance::{Instance, InstancePtr};
use oak_di::Component;

// a service we would like to use in the application
#[derive(Component)]
struct Greeter {
    greeting: String,
}

impl Greeter {
    fn greet(&self, name: &str) {
        println!("{} {name}!", self.greeting);
    }
}

// an eager provider - it's booted when the application bootstraps
#[derive(Default)]
struct GreetingProvider {
    boot_flag: BootFlag,
}

impl ServiceProvider for GreetingProvider {
    // only install bindings here, since other providers might not be registered yet
    fn register(&self, container: &mut dyn Container) -> Result<(), ErrorPtr> {
        container.instance(
            Contract::named("greeting"),
            Instance::of("Hello".to_string()),
        );
        container.when_asks_give(
            Contract::of::<Greeter>(),
            "greeting".into(),
            Contract::named("greeting").into(),
        );
        container.singleton(Contract::of::<Greeter>(), Implementation::component::<Greeter>());
        Ok(())
    }

    // all providers are registered at this point, so it's safe to use other services
    fn boot(&self, container: &mut dyn Container) -> Result<(), ErrorPtr> {
        let greeter = container.get_typed::<Greeter>().map_err(convert_error)?;
        greeter.greet("provider");
        Ok(())
    }

    fn boot_flag(&self) -> &BootFlag {
        &self.boot_flag
    }
}

// a lazy provider - it's booted only when "report" is requested for the first time
#[derive(Default)]
struct ReportProvider {
    boot_flag: BootFlag,
}

impl ServiceProvider for ReportProvider {
    fn register(&self, container: &mut dyn Container) -> Result<(), ErrorPtr> {
        container.singleton(
            Contract::named("report"),
            Implementation::factory(|container| {
                let greeter = container.get_typed::<Greeter>()?;
                Ok(Instance::new(greeter))
            }),
        );
        Ok(())
    }

    fn boot(&self, _container: &mut dyn Container) -> Result<(), ErrorPtr> {
        println!("Report provider booted!");
        Ok(())
    }

    fn is_lazy(&self) -> bool {
        true
    }

    fn provides(&self) -> Vec<Contract> {
        vec![Contract::named("report")]
    }

    fn boot_flag(&self) -> &BootFlag {
        &self.boot_flag
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    // create our application, configured from the environment
    let mut application =
        application::create_default().expect("unable to create default application");

    application
        .register(vec![
            ProviderRegistration::instance(GreetingProvider::default()),
            ProviderRegistration::instance(ReportProvider::default()),
        ])
        .expect("error registering providers");

    // prints "Hello provider!"
    application.bootstrap().expect("error booting application");

    // prints "Report provider booted!", followed by "Hello world!"
    let greeter: InstancePtr<Greeter> = application
        .get(&Contract::named("report"))
        .and_then(|instance| instance.downcast())
        .expect("error resolving report");
    greeter.greet("world");
}
