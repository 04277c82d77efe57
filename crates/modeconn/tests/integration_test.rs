//! End-to-end integration test for the modeconn framework.
//! This test walks through a complete mode connectivity experiment.

use modeconn::prelude::*;

/// Test 1: Basic tensor operations work
#[test]
fn test_tensor_operations() {
    let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    let b = Tensor::from_vec(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap();

    let c = a.add(&b).unwrap();
    assert_eq!(c.to_vec(), vec![6.0, 8.0, 10.0, 12.0]);

    let d = a.matmul(&b).unwrap();
    assert_eq!(d.shape(), &[2, 2]);

    println!("✓ Tensor operations work");
}

/// Test 2: Autograd works (forward + backward)
#[test]
fn test_autograd_backward() {
    let x = Variable::new(
        Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap(),
        true,
    );

    let loss = x.mul_scalar(2.0).sum();
    loss.backward();

    let grad = x.grad().unwrap();
    assert_eq!(grad.to_vec(), vec![2.0, 2.0, 2.0, 2.0]);

    println!("✓ Autograd forward/backward works");
}

/// Test 3: Neural network layers work
#[test]
fn test_neural_network() {
    let fc1 = Linear::new(4, 8);
    let fc2 = Linear::new(8, 2);
    let relu = ReLU;

    let input = Variable::new(
        Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[1, 4]).unwrap(),
        false,
    );
    let output = fc2.forward(&relu.forward(&fc1.forward(&input)));

    assert_eq!(output.data().shape(), &[1, 2]);
    println!("✓ Neural network forward pass works");
}

/// Test 4: Curve coefficient functions work
#[test]
fn test_curve_coefficients() {
    let bezier = Bezier::new(3);
    assert_eq!(bezier.coefficients(0.0), vec![1.0, 0.0, 0.0]);
    assert_eq!(bezier.coefficients(1.0), vec![0.0, 0.0, 1.0]);
    assert_eq!(bezier.coefficients(0.5), vec![0.25, 0.5, 0.25]);

    let chain = PolyChain::new(3);
    assert_eq!(chain.coefficients(0.5), vec![0.0, 1.0, 0.0]);

    // Coefficients always partition unity
    let total: f32 = bezier.coefficients(0.37).iter().sum();
    assert!((total - 1.0).abs() < 1e-6);

    println!("✓ Curve coefficients work");
}

/// Test 5: Gradients flow to the trainable bends only
#[test]
fn test_curve_layer_gradients() {
    let fixed = fix_points(3, true, true);
    let layer = modeconn::curves::CurveLinear::new(3, 2, &fixed);

    let input = Variable::new(Tensor::from_vec(vec![1.0, 2.0, 3.0], &[1, 3]).unwrap(), false);
    let bezier = Bezier::new(3);
    let output = layer.forward_t(&input, &bezier.coefficients(0.5));

    let loss = output.sum();
    loss.backward();

    let params = layer.parameters();
    // weight_0, weight_1, weight_2, bias_0, bias_1, bias_2
    assert!(params[0].grad().is_none());
    assert!(params[1].grad().is_some());
    assert!(params[2].grad().is_none());

    println!("✓ Curve layer gradients reach the trainable bends");
}

/// Test 6: Connecting two models with a Bezier curve
#[test]
fn test_connect_two_models() {
    let mut model_a = VggBase::with_options(4, 16, false, 1, 0.5, false);
    let mut model_b = VggBase::with_options(4, 16, false, 1, 0.5, false);
    model_a.eval();
    model_b.eval();

    let fixed = fix_points(3, true, true);
    let mut net = CurveNet::new(Box::new(Bezier::new(3)), Box::new(VGG16.curve(4, &fixed, 1)));
    net.import_base_parameters(&model_a, 0);
    net.import_base_parameters(&model_b, 2);
    net.init_linear();
    net.eval();

    let input = Variable::new(
        modeconn::tensor::uniform(&[2, 3, 32, 32], -1.0, 1.0),
        false,
    );

    // The endpoints reproduce the imported models
    let at_start = net.forward_t(&input, Some(0.0));
    let from_a = model_a.forward(&input);
    assert_close(&at_start.data().to_vec(), &from_a.data().to_vec(), 1e-4);

    let at_end = net.forward_t(&input, Some(1.0));
    let from_b = model_b.forward(&input);
    assert_close(&at_end.data().to_vec(), &from_b.data().to_vec(), 1e-4);

    // After init_linear the Bezier midpoint equals the parameter average
    let average = VggBase::with_options(4, 16, false, 1, 0.5, false);
    let avg_params = average.parameters();
    let a_params = model_a.parameters();
    let b_params = model_b.parameters();
    for i in 0..avg_params.len() {
        let mean = a_params[i]
            .data()
            .mul_scalar(0.5)
            .add(&b_params[i].data().mul_scalar(0.5))
            .unwrap();
        avg_params[i].update_data(mean);
    }
    let mut average = average;
    average.eval();

    let at_middle = net.forward_t(&input, Some(0.5));
    let from_average = average.forward(&input);
    assert_close(&at_middle.data().to_vec(), &from_average.data().to_vec(), 1e-3);

    println!("✓ Curve network connects two models");
}

/// Test 7: Batch normalization statistics follow the imported model
#[test]
fn test_batch_norm_import() {
    let mut base = VggBase::with_options(4, 16, true, 1, 0.5, false);

    // Move the running statistics away from their initial values
    let batch = Variable::new(modeconn::tensor::uniform(&[4, 3, 32, 32], -2.0, 2.0), false);
    let _ = base.forward(&batch);
    base.eval();

    let fixed = fix_points(3, true, true);
    let mut net = CurveNet::new(
        Box::new(Bezier::new(3)),
        Box::new(VGG16BN.curve(4, &fixed, 1)),
    );
    net.import_base_parameters(&base, 0);
    net.import_base_buffers(&base);
    net.eval();

    let input = Variable::new(modeconn::tensor::uniform(&[2, 3, 32, 32], -1.0, 1.0), false);
    let from_curve = net.forward_t(&input, Some(0.0));
    let from_base = base.forward(&input);

    assert_close(&from_curve.data().to_vec(), &from_base.data().to_vec(), 1e-4);

    println!("✓ Batch norm statistics import works");
}

/// Test 8: L2 regularization over the blended weights
#[test]
fn test_l2_regularization() {
    let fixed = fix_points(2, true, true);
    let mut net = CurveNet::new(Box::new(PolyChain::new(2)), Box::new(VGG16.curve(4, &fixed, 1)));
    net.eval();

    assert_eq!(net.l2(), 0.0);

    let input = Variable::new(modeconn::tensor::uniform(&[1, 3, 32, 32], -1.0, 1.0), false);
    let _ = net.forward_t(&input, Some(0.25));

    let l2 = net.l2();
    assert!(l2 > 0.0);

    let penalty = l2_regularizer(1e-4)(&net);
    assert!((penalty - 0.5 * 1e-4 * l2).abs() < 1e-9);

    println!("✓ L2 regularization works (l2 = {:.4})", l2);
}

/// Test 9: Sizing helpers and the flattened weight vector
#[test]
fn test_sizing_helpers() {
    let model = VggBase::with_options(10, 16, false, 2, 0.5, false);
    assert_eq!(model.num_parameters(), vgg16_size(2, 10));
    assert_eq!(vgg16_compute_k(vgg16_size(2, 10), 10), 2);

    let fixed = fix_points(2, true, true);
    let net = CurveNet::new(Box::new(PolyChain::new(2)), Box::new(VGG16.curve(10, &fixed, 2)));
    let flat = net.weights(0.5);
    assert_eq!(flat.len(), vgg16_size(2, 10));

    println!("✓ Sizing helpers work");
}

fn assert_close(a: &[f32], b: &[f32], tolerance: f32) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < tolerance, "{x} vs {y}");
    }
}
